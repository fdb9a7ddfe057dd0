//! Transient feedback: label swaps and the toast.
//!
//! Every cycle runs as an abortable task registered in a [`FeedbackSlot`];
//! starting a new cycle in the same slot aborts the previous one, so a stale
//! timer can never overwrite newer feedback.

use futures::FutureExt;
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use std::rc::Rc;
use std::time::Duration;

use super::{PromptButton, WidgetState};
use crate::page::{Page, ToastKind};
use crate::prompt::Messages;

/// Holds the cancellation token of the pending cycle for one feedback target.
#[derive(Debug, Default)]
pub(crate) struct FeedbackSlot {
    pending: Option<AbortHandle>,
}

impl FeedbackSlot {
    /// Abort the pending cycle, if any, and register a new one.
    pub fn begin(&mut self) -> AbortRegistration {
        self.cancel();
        let (handle, registration) = AbortHandle::new_pair();
        self.pending = Some(handle);
        registration
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for FeedbackSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `action` after `delay` unless the registration is aborted first.
fn schedule<P: Page>(page: &P, registration: AbortRegistration, delay: Duration, action: impl FnOnce() + 'static) {
    let sleep = page.sleep(delay);
    let task = Abortable::new(
        async move {
            sleep.await;
            action();
        },
        registration,
    );
    page.spawn(task.map(|_| ()).boxed_local());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Outcome {
    Copied,
    Failed,
}

impl<P: Page> PromptButton<P> {
    pub(super) fn show_feedback(&self, element: &P::Element, outcome: Outcome, messages: &Messages) {
        let config = &self.inner.config;
        let (label, toast, kind, delay) = match outcome {
            Outcome::Copied => (messages.copied, messages.toast_copied, ToastKind::Success, config.success_delay),
            Outcome::Failed => (messages.copy_failed, messages.toast_failed, ToastKind::Failure, config.failure_delay),
        };
        self.flash_label(element, label, delay);
        self.show_toast(toast, kind);
    }

    /// Swap the button label to `text`, then restore the captured original.
    fn flash_label(&self, element: &P::Element, text: &str, delay: Duration) {
        let inner = &self.inner;
        let (registration, original) = {
            let mut state = inner.state.borrow_mut();
            let Some(button) = state.button.as_mut().filter(|b| b.element == *element) else {
                return;
            };
            (button.label_feedback.begin(), button.original_label.clone())
        };

        inner.page.set_text(element, text);

        let weak = Rc::downgrade(inner);
        let target = element.clone();
        schedule(&inner.page, registration, delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.page.set_text(&target, &original);
            }
        });
    }

    /// Show the single toast; desktop only.
    fn show_toast(&self, message: &str, kind: ToastKind) {
        let inner = &self.inner;
        let enabled = inner
            .config
            .toast_query
            .as_deref()
            .is_some_and(|query| inner.page.matches_media(query));
        if !enabled {
            return;
        }

        let registration = {
            let mut state = inner.state.borrow_mut();
            if state.phase != WidgetState::Bound {
                return;
            }
            state.toast_feedback.begin()
        };

        inner.page.show_toast(&inner.config.toast_id, message, kind);

        let weak = Rc::downgrade(inner);
        let toast_id = inner.config.toast_id.clone();
        schedule(&inner.page, registration, inner.config.toast_duration, move || {
            if let Some(inner) = weak.upgrade() {
                inner.page.hide_toast(&toast_id);
            }
        });
    }
}
