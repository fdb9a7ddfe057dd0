//! The "open this page as a prompt" button.
//!
//! [`PromptButton`] owns at most one button element. The host calls
//! [`PromptButton::reconcile`] after every page swap; the call is idempotent
//! for an element it already manages and re-derives everything for a new one.

pub mod clipboard;
mod feedback;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use self::feedback::{FeedbackSlot, Outcome};
use crate::config::WidgetConfig;
use crate::page::{Interaction, Page, UiEvent};
use crate::prompt::{Messages, PageContext, compose_for_page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// No element managed: not reconciled yet, or the page has no anchor for the button
    Unbound,
    /// Handlers attached to the managed element
    Bound,
    /// Viewport excluded by the activation query; button and toast detached
    Removed,
}

struct BoundButton<E> {
    element: E,
    original_label: String,
    label_feedback: FeedbackSlot,
}

struct State<E> {
    phase: WidgetState,
    button: Option<BoundButton<E>>,
    toast_feedback: FeedbackSlot,
}

struct Inner<P: Page> {
    page: P,
    config: WidgetConfig,
    state: RefCell<State<P::Element>>,
}

/// Handle to the prompt button controller. Clones share state.
pub struct PromptButton<P: Page> {
    inner: Rc<Inner<P>>,
}

impl<P: Page> Clone for PromptButton<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: Page> PromptButton<P> {
    pub fn new(page: P, config: WidgetConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                page,
                config,
                state: RefCell::new(State {
                    phase: WidgetState::Unbound,
                    button: None,
                    toast_feedback: FeedbackSlot::default(),
                }),
            }),
        }
    }

    fn upgrade(weak: &Weak<Inner<P>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn state(&self) -> WidgetState {
        self.inner.state.borrow().phase
    }

    /// The managed element, while bound.
    pub fn element(&self) -> Option<P::Element> {
        let state = self.inner.state.borrow();
        match state.phase {
            WidgetState::Bound => state.button.as_ref().map(|b| b.element.clone()),
            _ => None,
        }
    }

    /// Label restored after transient feedback.
    pub fn original_label(&self) -> Option<String> {
        self.inner.state.borrow().button.as_ref().map(|b| b.original_label.clone())
    }

    fn is_current(&self, element: &P::Element) -> bool {
        self.element().is_some_and(|managed| managed == *element)
    }

    /// Bring the widget in line with the current page and viewport.
    pub fn reconcile(&self) -> WidgetState {
        let inner = &self.inner;
        let config = &inner.config;

        if !inner.page.matches_media(&config.activation_query) {
            self.teardown();
            return WidgetState::Removed;
        }

        let context = PageContext::capture(&inner.page, config);
        let messages = Messages::for_language(&context.language);
        let (_, share_url) = compose_for_page(config, &context);

        let found = inner.page.element_by_id(&config.button_id).or_else(|| {
            inner.page.insert_button(
                &config.insertion_points,
                &config.wrapper_class,
                &config.button_id,
                messages.label,
                &share_url,
            )
        });

        let mut state = inner.state.borrow_mut();
        let Some(element) = found else {
            state.button = None;
            state.phase = WidgetState::Unbound;
            return WidgetState::Unbound;
        };

        if state.button.as_ref().is_some_and(|b| b.element == element) {
            state.phase = WidgetState::Bound;
            drop(state);
            inner.page.set_href(&element, &share_url);
            return WidgetState::Bound;
        }

        let text = inner.page.text(&element);
        let original_label = match text.trim() {
            "" => messages.label.to_string(),
            label => label.to_string(),
        };
        state.button = Some(BoundButton {
            element: element.clone(),
            original_label,
            label_feedback: FeedbackSlot::default(),
        });
        state.phase = WidgetState::Bound;
        drop(state);

        inner.page.set_href(&element, &share_url);
        self.attach(&element);
        WidgetState::Bound
    }

    fn attach(&self, element: &P::Element) {
        let weak = Rc::downgrade(&self.inner);
        let target = element.clone();
        self.inner.page.listen(
            element,
            Interaction::Intent,
            Rc::new(move |_: &dyn UiEvent| {
                if let Some(widget) = Self::upgrade(&weak)
                    && widget.is_current(&target)
                {
                    widget.refresh_target();
                }
            }),
        );

        let weak = Rc::downgrade(&self.inner);
        let target = element.clone();
        self.inner.page.listen(
            element,
            Interaction::Activate,
            Rc::new(move |event: &dyn UiEvent| {
                if let Some(widget) = Self::upgrade(&weak)
                    && widget.is_current(&target)
                {
                    widget.handle_activation(event);
                }
            }),
        );
    }

    fn teardown(&self) {
        let inner = &self.inner;
        let stale = {
            let mut state = inner.state.borrow_mut();
            state.toast_feedback.cancel();
            state.phase = WidgetState::Removed;
            state.button.take()
        };

        if let Some(button) = stale {
            inner.page.remove(&button.element);
        }
        if let Some(authored) = inner.page.element_by_id(&inner.config.button_id) {
            inner.page.remove(&authored);
        }
        inner.page.remove_toast(&inner.config.toast_id);
    }

    /// Point the button at the share URL for the page as it is right now.
    pub fn refresh_target(&self) {
        let Some(element) = self.element() else {
            return;
        };
        let context = PageContext::capture(&self.inner.page, &self.inner.config);
        let (_, share_url) = compose_for_page(&self.inner.config, &context);
        self.inner.page.set_href(&element, &share_url);
    }

    /// Click handler: keep the browser from following the link and run
    /// [`activate`](Self::activate) on the page's executor.
    pub fn handle_activation(&self, event: &dyn UiEvent) {
        event.prevent_default();
        let widget = self.clone();
        self.inner.page.spawn(Box::pin(async move { widget.activate().await }));
    }

    /// Copy the prompt, give feedback, open the share URL.
    ///
    /// The share URL opens whatever happens to the copy. When the first copy
    /// fails and `retry_after_open` is set, one more attempt is made after the
    /// new context is opened.
    pub async fn activate(&self) {
        let inner = &self.inner;
        let Some(element) = self.element() else {
            return;
        };

        let context = PageContext::capture(&inner.page, &inner.config);
        let messages = Messages::for_language(&context.language);
        let (prompt, share_url) = compose_for_page(&inner.config, &context);
        inner.page.set_href(&element, &share_url);

        let copied = clipboard::copy_text(&inner.page, &prompt).await;
        match &copied {
            Ok(()) => self.show_feedback(&element, Outcome::Copied, messages),
            Err(e) => {
                inner.page.warn(&format!("[prompt-button] Could not copy prompt: {}", e));
                self.show_feedback(&element, Outcome::Failed, messages);
            }
        }

        if let Some(delay) = inner.config.open_delay {
            inner.page.sleep(delay).await;
        }

        if let Err(e) = inner.page.open_external(&share_url) {
            inner.page.warn(&format!("[prompt-button] Could not open {}: {}", share_url, e));
        }

        if copied.is_err() && inner.config.retry_after_open {
            match clipboard::copy_text(&inner.page, &prompt).await {
                Ok(()) => self.show_feedback(&element, Outcome::Copied, messages),
                Err(e) => inner.page.warn(&format!("[prompt-button] Retry copy failed: {}", e)),
            }
        }
    }
}
