//! Browser side: [`Page`] over web-sys and the page-ready wiring.

mod drawer;
mod lang_links;

use futures::future::LocalBoxFuture;
use js_sys::Reflect;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlDocument, HtmlTextAreaElement, Window};

use crate::config::WidgetConfig;
use crate::page::{CopyError, Interaction, Listener, Page, PageError, ToastKind, UiEvent};
use crate::widget::PromptButton;

/// Global the host sets to override prompt templates.
const HOST_TEMPLATE_GLOBAL: &str = "chatgptPromptTemplate";

/// Marks wrappers this crate inserted, so removing a button removes them too.
const SYNTHESIZED_ATTR: &str = "data-docs-widget";

const TOAST_CLASS: &str = "chatgpt-toast";
const TOAST_VISIBLE_CLASS: &str = "chatgpt-toast--visible";

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", value))
}

impl UiEvent for web_sys::Event {
    fn prevent_default(&self) {
        web_sys::Event::prevent_default(self);
    }
}

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }
}

impl Page for WebPage {
    type Element = Element;

    /// `window.chatgptPromptTemplate`, converted to JSON.
    fn host_templates(&self) -> Option<serde_json::Value> {
        let value = Reflect::get(&self.window, &JsValue::from_str(HOST_TEMPLATE_GLOBAL)).ok()?;
        if let Some(template) = value.as_string() {
            return Some(serde_json::Value::String(template));
        }
        if !value.is_object() {
            return None;
        }
        let json = js_sys::JSON::stringify(&value).ok().map(String::from)?;
        serde_json::from_str(&json)
            .map_err(|e| self.warn(&format!("[prompt-button] Ignoring {}: {}", HOST_TEMPLATE_GLOBAL, e)))
            .ok()
    }

    fn href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn document_lang(&self) -> Option<String> {
        self.document.document_element()?.get_attribute("lang")
    }

    fn set_document_lang(&self, lang: &str) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute("lang", lang);
        }
    }

    fn matches_media(&self, query: &str) -> bool {
        // No matchMedia: behave as if every query matched
        match self.window.match_media(query) {
            Ok(Some(list)) => list.matches(),
            _ => true,
        }
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn insert_button(
        &self,
        insertion_points: &[String],
        wrapper_class: &str,
        id: &str,
        label: &str,
        href: &str,
    ) -> Option<Element> {
        let parent = insertion_points
            .iter()
            .find_map(|selector| self.document.query_selector(selector).ok().flatten())?;

        let wrapper = self.document.create_element("div").ok()?;
        wrapper.set_class_name(wrapper_class);
        wrapper.set_attribute(SYNTHESIZED_ATTR, "").ok()?;

        let anchor = self.document.create_element("a").ok()?;
        anchor.set_id(id);
        anchor.set_class_name("md-button");
        anchor.set_text_content(Some(label));
        for (name, value) in [("href", href), ("target", "_blank"), ("rel", "noopener")] {
            anchor.set_attribute(name, value).ok()?;
        }

        wrapper.append_child(&anchor).ok()?;
        parent.prepend_with_node_1(&wrapper).ok()?;
        Some(anchor)
    }

    fn text(&self, element: &Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_href(&self, element: &Element, href: &str) {
        let _ = element.set_attribute("href", href);
    }

    fn remove(&self, element: &Element) {
        match element.parent_element() {
            Some(wrapper) if wrapper.has_attribute(SYNTHESIZED_ATTR) => wrapper.remove(),
            _ => element.remove(),
        }
    }

    fn listen(&self, element: &Element, interaction: Interaction, listener: Listener) {
        for name in interaction.event_names() {
            let listener = Rc::clone(&listener);
            let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| listener(&event));
            if let Err(e) = element.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
                self.warn(&format!("[prompt-button] Could not listen for {}: {}", name, describe(&e)));
            }
            // Lives as long as the element
            closure.forget();
        }
    }

    fn show_toast(&self, id: &str, message: &str, kind: ToastKind) {
        let toast = match self.document.get_element_by_id(id) {
            Some(existing) => existing,
            None => {
                let (Ok(toast), Some(body)) = (self.document.create_element("div"), self.document.body()) else {
                    return;
                };
                toast.set_id(id);
                let _ = toast.set_attribute("role", "status");
                let _ = toast.set_attribute("aria-live", "polite");
                if body.append_child(&toast).is_err() {
                    return;
                }
                toast
            }
        };

        toast.set_text_content(Some(message));
        toast.set_class_name(&format!(
            "{} {}--{} {}",
            TOAST_CLASS,
            TOAST_CLASS,
            kind.class_suffix(),
            TOAST_VISIBLE_CLASS
        ));
    }

    fn hide_toast(&self, id: &str) {
        if let Some(toast) = self.document.get_element_by_id(id) {
            let _ = toast.class_list().remove_1(TOAST_VISIBLE_CLASS);
        }
    }

    fn remove_toast(&self, id: &str) {
        if let Some(toast) = self.document.get_element_by_id(id) {
            toast.remove();
        }
    }

    fn clipboard_write(&self, text: &str) -> Option<LocalBoxFuture<'static, Result<(), CopyError>>> {
        // Absent outside secure contexts
        let clipboard = Reflect::get(&self.window.navigator(), &JsValue::from_str("clipboard")).ok()?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return None;
        }
        if !Reflect::has(&clipboard, &JsValue::from_str("writeText")).unwrap_or(false) {
            return None;
        }

        let promise = clipboard.unchecked_into::<web_sys::Clipboard>().write_text(text);
        Some(Box::pin(async move {
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| CopyError::Rejected(describe(&e)))
        }))
    }

    fn create_scratch_field(&self, text: &str) -> Result<Element, CopyError> {
        let field = self
            .document
            .create_element("textarea")
            .map_err(|e| CopyError::Legacy(describe(&e)))?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| CopyError::Legacy("created element is not a textarea".to_string()))?;

        field.set_value(text);
        field.set_read_only(true);
        let style = field.style();
        for (property, value) in [("position", "absolute"), ("left", "-9999px"), ("top", "0")] {
            let _ = style.set_property(property, value);
        }

        let body = self
            .document
            .body()
            .ok_or_else(|| CopyError::Legacy("document has no body".to_string()))?;
        body.append_child(&field).map_err(|e| CopyError::Legacy(describe(&e)))?;
        Ok(field.unchecked_into())
    }

    fn copy_selection(&self, field: &Element) -> Result<(), CopyError> {
        let textarea = field
            .dyn_ref::<HtmlTextAreaElement>()
            .ok_or_else(|| CopyError::Legacy("scratch field is not a textarea".to_string()))?;
        let _ = textarea.focus();
        textarea.select();

        let document = self
            .document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| CopyError::Legacy("execCommand is not supported".to_string()))?;
        match document.exec_command("copy") {
            Ok(true) => Ok(()),
            Ok(false) => Err(CopyError::Legacy("copy command was refused".to_string())),
            Err(e) => Err(CopyError::Legacy(describe(&e))),
        }
    }

    fn open_external(&self, url: &str) -> Result<(), PageError> {
        self.window
            .open_with_url_and_target_and_features(url, "_blank", "noopener")
            .map(|_| ())
            .map_err(|e| PageError::new("window.open", describe(&e)))
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(duration))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn warn(&self, message: &str) {
        web_sys::console::warn_1(&message.into());
    }
}

/// `document.readyState` past `"loading"`: DOMContentLoaded already fired.
fn document_loaded(ready_state: &str) -> bool {
    ready_state != "loading"
}

/// Run `callback` for every rendered view.
///
/// Material's `document$` observable fires after each in-place navigation;
/// without it the callback runs once, when the document has loaded.
fn on_page_ready(window: &Window, document: &Document, callback: impl Fn() + 'static) {
    let observable = Reflect::get(window, &JsValue::from_str("document$"))
        .ok()
        .filter(JsValue::is_object);
    if let Some(observable) = observable
        && let Ok(subscribe) = Reflect::get(&observable, &JsValue::from_str("subscribe"))
        && let Some(subscribe) = subscribe.dyn_ref::<js_sys::Function>()
    {
        let closure = Closure::<dyn Fn()>::new(callback);
        if let Err(e) = subscribe.call1(&observable, closure.as_ref()) {
            web_sys::console::warn_1(&format!("[docs-widgets] document$.subscribe failed: {}", describe(&e)).into());
        }
        closure.forget();
        return;
    }

    if document_loaded(&document.ready_state()) {
        callback();
        return;
    }

    let closure = Closure::<dyn Fn()>::new(callback);
    let _ = document.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Call `callback` whenever `query` starts or stops matching.
fn on_media_change(window: &Window, query: &str, callback: impl Fn() + 'static) {
    let Ok(Some(list)) = window.match_media(query) else {
        return;
    };
    let closure = Closure::<dyn Fn()>::new(callback);
    let _ = list.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let Some(page) = WebPage::new() else {
        return;
    };
    let window = page.window.clone();
    let document = page.document.clone();

    let config = WidgetConfig::default();
    let activation_query = config.activation_query.clone();
    let widget = PromptButton::new(page, config);

    on_media_change(&window, &activation_query, {
        let widget = widget.clone();
        move || {
            widget.reconcile();
        }
    });

    let ready_window = window.clone();
    on_page_ready(&window, &document, move || {
        widget.reconcile();
        lang_links::rewrite_menu_links(&ready_window);
        drawer::reset_after_theme_ready(&ready_window);
    });
}
