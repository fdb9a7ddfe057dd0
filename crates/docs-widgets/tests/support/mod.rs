//! Scripted stand-in for the browser, with a manual clock.

#![allow(dead_code)]

use docs_widgets::page::{CopyError, Interaction, Listener, Page, PageError, ToastKind, UiEvent};
use docs_widgets::{PromptButton, WidgetConfig};
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use futures::FutureExt;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeElement(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Granted,
    Denied,
    Missing,
    /// Rejects until a share URL has been opened
    DeniedUntilOpened,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub visible: bool,
}

struct ElementData {
    id: Option<String>,
    text: String,
    href: Option<String>,
    attached: bool,
    scratch: bool,
    listeners: Vec<(Interaction, Listener)>,
}

struct World {
    href: String,
    pathname: String,
    lang: Option<String>,
    wide: bool,
    /// Per-query overrides of `wide`
    media: HashMap<String, bool>,
    host_templates: Option<Value>,
    has_insertion_point: bool,
    elements: Vec<ElementData>,
    toast: Option<Toast>,
    toasts_created: usize,
    clipboard_mode: ClipboardMode,
    legacy_works: bool,
    clipboard: Option<String>,
    opened: Vec<String>,
    href_writes: usize,
    warnings: Vec<String>,
    now: Duration,
    timers: Vec<(Duration, oneshot::Sender<()>)>,
}

#[derive(Clone)]
pub struct FakePage {
    world: Rc<RefCell<World>>,
    spawner: LocalSpawner,
}

struct FakeEvent {
    prevented: Cell<bool>,
}

impl UiEvent for FakeEvent {
    fn prevent_default(&self) {
        self.prevented.set(true);
    }
}

impl FakePage {
    fn new(spawner: LocalSpawner) -> Self {
        Self {
            world: Rc::new(RefCell::new(World {
                href: "https://site.example/en/guide/".to_string(),
                pathname: "/en/guide/".to_string(),
                lang: Some("en".to_string()),
                wide: true,
                media: HashMap::new(),
                host_templates: None,
                has_insertion_point: true,
                elements: Vec::new(),
                toast: None,
                toasts_created: 0,
                clipboard_mode: ClipboardMode::Granted,
                legacy_works: true,
                clipboard: None,
                opened: Vec::new(),
                href_writes: 0,
                warnings: Vec::new(),
                now: Duration::ZERO,
                timers: Vec::new(),
            })),
            spawner,
        }
    }

    // ── Scripting ───────────────────────────────────────────────────────────

    /// Navigate in place: `url` must be absolute.
    pub fn navigate(&self, url: &str) {
        let path_start = url.find("://").map(|i| i + 3).unwrap_or(0);
        let pathname = url[path_start..].find('/').map(|i| &url[path_start + i..]).unwrap_or("/");
        let pathname = pathname.split(['?', '#']).next().unwrap_or("/").to_string();
        let mut world = self.world.borrow_mut();
        world.href = url.to_string();
        world.pathname = pathname;
    }

    pub fn set_lang(&self, lang: Option<&str>) {
        self.world.borrow_mut().lang = lang.map(str::to_string);
    }

    pub fn set_wide(&self, wide: bool) {
        self.world.borrow_mut().wide = wide;
    }

    /// Make `query` match (or not) regardless of the viewport width.
    pub fn set_media(&self, query: &str, matches: bool) {
        self.world.borrow_mut().media.insert(query.to_string(), matches);
    }

    /// Set (or clear) `window.chatgptPromptTemplate`.
    pub fn set_host_templates(&self, value: Option<Value>) {
        self.world.borrow_mut().host_templates = value;
    }

    pub fn set_insertion_point(&self, present: bool) {
        self.world.borrow_mut().has_insertion_point = present;
    }

    pub fn set_clipboard(&self, mode: ClipboardMode, legacy_works: bool) {
        let mut world = self.world.borrow_mut();
        world.clipboard_mode = mode;
        world.legacy_works = legacy_works;
    }

    /// Add a button the way the site template renders it.
    pub fn add_button(&self, id: &str, label: &str) -> FakeElement {
        self.push_element(ElementData {
            id: Some(id.to_string()),
            text: label.to_string(),
            href: Some("https://chatgpt.com/".to_string()),
            attached: true,
            scratch: false,
            listeners: Vec::new(),
        })
    }

    /// Drop every element, as when the host swaps the page content.
    pub fn swap_content(&self) {
        for element in self.world.borrow_mut().elements.iter_mut() {
            element.attached = false;
        }
    }

    /// Dispatch `interaction` on `element`; returns whether default was prevented.
    pub fn fire(&self, element: FakeElement, interaction: Interaction) -> bool {
        let listeners: Vec<Listener> = self.world.borrow().elements[element.0]
            .listeners
            .iter()
            .filter(|(kind, _)| *kind == interaction)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        let event = FakeEvent {
            prevented: Cell::new(false),
        };
        for listener in listeners {
            listener(&event);
        }
        event.prevented.get()
    }

    // ── Inspection ──────────────────────────────────────────────────────────

    pub fn by_id(&self, id: &str) -> Option<FakeElement> {
        self.element_by_id(id)
    }

    pub fn text_of(&self, element: FakeElement) -> String {
        self.world.borrow().elements[element.0].text.clone()
    }

    pub fn href_of(&self, element: FakeElement) -> Option<String> {
        self.world.borrow().elements[element.0].href.clone()
    }

    pub fn is_attached(&self, element: FakeElement) -> bool {
        self.world.borrow().elements[element.0].attached
    }

    pub fn listener_count(&self, element: FakeElement) -> usize {
        self.world.borrow().elements[element.0].listeners.len()
    }

    pub fn attached_scratch_fields(&self) -> usize {
        self.world
            .borrow()
            .elements
            .iter()
            .filter(|e| e.scratch && e.attached)
            .count()
    }

    pub fn lang(&self) -> Option<String> {
        self.world.borrow().lang.clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.world.borrow().clipboard.clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.world.borrow().opened.clone()
    }

    pub fn toast(&self) -> Option<Toast> {
        self.world.borrow().toast.clone()
    }

    pub fn toasts_created(&self) -> usize {
        self.world.borrow().toasts_created
    }

    pub fn href_writes(&self) -> usize {
        self.world.borrow().href_writes
    }

    pub fn warnings(&self) -> Vec<String> {
        self.world.borrow().warnings.clone()
    }

    fn push_element(&self, data: ElementData) -> FakeElement {
        let mut world = self.world.borrow_mut();
        world.elements.push(data);
        FakeElement(world.elements.len() - 1)
    }
}

impl Page for FakePage {
    type Element = FakeElement;

    fn href(&self) -> String {
        self.world.borrow().href.clone()
    }

    fn pathname(&self) -> String {
        self.world.borrow().pathname.clone()
    }

    fn document_lang(&self) -> Option<String> {
        self.world.borrow().lang.clone()
    }

    fn set_document_lang(&self, lang: &str) {
        self.world.borrow_mut().lang = Some(lang.to_string());
    }

    fn matches_media(&self, query: &str) -> bool {
        let world = self.world.borrow();
        world.media.get(query).copied().unwrap_or(world.wide)
    }

    fn host_templates(&self) -> Option<Value> {
        self.world.borrow().host_templates.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.world
            .borrow()
            .elements
            .iter()
            .position(|e| e.attached && e.id.as_deref() == Some(id))
            .map(FakeElement)
    }

    fn insert_button(
        &self,
        _insertion_points: &[String],
        _wrapper_class: &str,
        id: &str,
        label: &str,
        href: &str,
    ) -> Option<FakeElement> {
        if !self.world.borrow().has_insertion_point {
            return None;
        }
        Some(self.push_element(ElementData {
            id: Some(id.to_string()),
            text: label.to_string(),
            href: Some(href.to_string()),
            attached: true,
            scratch: false,
            listeners: Vec::new(),
        }))
    }

    fn text(&self, element: &FakeElement) -> String {
        self.text_of(*element)
    }

    fn set_text(&self, element: &FakeElement, text: &str) {
        self.world.borrow_mut().elements[element.0].text = text.to_string();
    }

    fn set_href(&self, element: &FakeElement, href: &str) {
        let mut world = self.world.borrow_mut();
        world.elements[element.0].href = Some(href.to_string());
        world.href_writes += 1;
    }

    fn remove(&self, element: &FakeElement) {
        self.world.borrow_mut().elements[element.0].attached = false;
    }

    fn listen(&self, element: &FakeElement, interaction: Interaction, listener: Listener) {
        self.world.borrow_mut().elements[element.0]
            .listeners
            .push((interaction, listener));
    }

    fn show_toast(&self, _id: &str, message: &str, kind: ToastKind) {
        let mut world = self.world.borrow_mut();
        if world.toast.is_none() {
            world.toasts_created += 1;
        }
        world.toast = Some(Toast {
            message: message.to_string(),
            kind,
            visible: true,
        });
    }

    fn hide_toast(&self, _id: &str) {
        if let Some(toast) = self.world.borrow_mut().toast.as_mut() {
            toast.visible = false;
        }
    }

    fn remove_toast(&self, _id: &str) {
        self.world.borrow_mut().toast = None;
    }

    fn clipboard_write(&self, text: &str) -> Option<LocalBoxFuture<'static, Result<(), CopyError>>> {
        let mut world = self.world.borrow_mut();
        let granted = match world.clipboard_mode {
            ClipboardMode::Missing => return None,
            ClipboardMode::Granted => true,
            ClipboardMode::Denied => false,
            ClipboardMode::DeniedUntilOpened => !world.opened.is_empty(),
        };
        let result = if granted {
            world.clipboard = Some(text.to_string());
            Ok(())
        } else {
            Err(CopyError::Rejected("NotAllowedError".to_string()))
        };
        Some(future::ready(result).boxed_local())
    }

    fn create_scratch_field(&self, text: &str) -> Result<FakeElement, CopyError> {
        Ok(self.push_element(ElementData {
            id: None,
            text: text.to_string(),
            href: None,
            attached: true,
            scratch: true,
            listeners: Vec::new(),
        }))
    }

    fn copy_selection(&self, field: &FakeElement) -> Result<(), CopyError> {
        let mut world = self.world.borrow_mut();
        if !world.legacy_works {
            return Err(CopyError::Legacy("copy command was refused".to_string()));
        }
        let text = world.elements[field.0].text.clone();
        world.clipboard = Some(text);
        Ok(())
    }

    fn open_external(&self, url: &str) -> Result<(), PageError> {
        self.world.borrow_mut().opened.push(url.to_string());
        Ok(())
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let (sender, receiver) = oneshot::channel();
        let mut world = self.world.borrow_mut();
        let deadline = world.now + duration;
        world.timers.push((deadline, sender));
        async move {
            let _ = receiver.await;
        }
        .boxed_local()
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("executor is alive");
    }

    fn warn(&self, message: &str) {
        self.world.borrow_mut().warnings.push(message.to_string());
    }
}

/// Executor + page + clock.
pub struct Harness {
    pool: LocalPool,
    pub page: FakePage,
}

impl Harness {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let page = FakePage::new(pool.spawner());
        Self { pool, page }
    }

    pub fn widget(&self) -> PromptButton<FakePage> {
        self.widget_with(WidgetConfig::default())
    }

    pub fn widget_with(&self, config: WidgetConfig) -> PromptButton<FakePage> {
        PromptButton::new(self.page.clone(), config)
    }

    /// Run spawned tasks until they all wait on the clock.
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Move the clock forward, firing due timers in order.
    pub fn advance(&mut self, millis: u64) {
        let target = self.page.world.borrow().now + Duration::from_millis(millis);
        loop {
            self.pool.run_until_stalled();
            let due = {
                let mut world = self.page.world.borrow_mut();
                let next = world
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (deadline, _))| *deadline <= target)
                    .min_by_key(|(_, (deadline, _))| *deadline)
                    .map(|(i, _)| i);
                next.map(|i| {
                    let (deadline, sender) = world.timers.remove(i);
                    world.now = deadline;
                    sender
                })
            };
            match due {
                Some(sender) => {
                    let _ = sender.send(());
                }
                None => break,
            }
        }
        self.page.world.borrow_mut().now = target;
        self.pool.run_until_stalled();
    }
}
