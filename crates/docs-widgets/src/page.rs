//! The slice of the browser the widgets touch.
//!
//! `web::WebPage` implements this over web-sys; the test suite drives the same
//! controller through a scripted fake.

use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Why a clipboard copy did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    #[error("clipboard API is not available")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    #[error("legacy copy failed: {0}")]
    Legacy(String),
}

/// A DOM operation the page could not perform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {reason}")]
pub struct PageError {
    pub operation: &'static str,
    pub reason: String,
}

impl PageError {
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }
}

/// Groups of DOM events the button listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// `mouseenter`, `focus`, `contextmenu`: the user is about to use the link
    Intent,
    /// `click`
    Activate,
}

impl Interaction {
    pub fn event_names(self) -> &'static [&'static str] {
        match self {
            Interaction::Intent => &["mouseenter", "focus", "contextmenu"],
            Interaction::Activate => &["click"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Failure,
}

impl ToastKind {
    pub fn class_suffix(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Failure => "failure",
        }
    }
}

/// The event handed to a listener.
pub trait UiEvent {
    fn prevent_default(&self);
}

pub type Listener = Rc<dyn Fn(&dyn UiEvent)>;

pub trait Page: 'static {
    /// Handle to a DOM element; equality is element identity.
    type Element: Clone + PartialEq + 'static;

    // Location and document metadata
    fn href(&self) -> String;
    fn pathname(&self) -> String;
    fn document_lang(&self) -> Option<String>;
    fn set_document_lang(&self, lang: &str);
    fn matches_media(&self, query: &str) -> bool;
    /// Current value of the host's template override global, if set.
    fn host_templates(&self) -> Option<serde_json::Value>;

    // Elements
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    /// Create `<div class=wrapper_class><a id=id ...>label</a></div>` as the
    /// first child of the first matching insertion point and return the anchor.
    fn insert_button(
        &self,
        insertion_points: &[String],
        wrapper_class: &str,
        id: &str,
        label: &str,
        href: &str,
    ) -> Option<Self::Element>;
    fn text(&self, element: &Self::Element) -> String;
    fn set_text(&self, element: &Self::Element, text: &str);
    fn set_href(&self, element: &Self::Element, href: &str);
    /// Detach `element` (and a synthesized wrapper around it) from the document.
    fn remove(&self, element: &Self::Element);
    fn listen(&self, element: &Self::Element, interaction: Interaction, listener: Listener);

    // Toast
    /// Show `message` in the toast node `id`, creating it if it does not exist.
    fn show_toast(&self, id: &str, message: &str, kind: ToastKind);
    fn hide_toast(&self, id: &str);
    fn remove_toast(&self, id: &str);

    // Clipboard
    /// Start an async clipboard write, or `None` when the API is missing.
    fn clipboard_write(&self, text: &str) -> Option<LocalBoxFuture<'static, Result<(), CopyError>>>;
    /// Append a hidden, read-only text field holding `text`.
    fn create_scratch_field(&self, text: &str) -> Result<Self::Element, CopyError>;
    /// Select the field's contents and run the legacy copy command.
    fn copy_selection(&self, field: &Self::Element) -> Result<(), CopyError>;

    /// Open `url` in a new browsing context without opener access.
    fn open_external(&self, url: &str) -> Result<(), PageError>;

    // Scheduling
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// Developer-facing diagnostics.
    fn warn(&self, message: &str);
}
