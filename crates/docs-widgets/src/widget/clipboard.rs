//! Clipboard copy: async Clipboard API first, hidden-textarea fallback second.

use crate::page::{CopyError, Page};

/// Hidden text field used by the legacy copy path; removed when dropped.
struct ScratchField<'a, P: Page> {
    page: &'a P,
    field: P::Element,
}

impl<'a, P: Page> ScratchField<'a, P> {
    fn create(page: &'a P, text: &str) -> Result<Self, CopyError> {
        let field = page.create_scratch_field(text)?;
        Ok(Self { page, field })
    }
}

impl<P: Page> Drop for ScratchField<'_, P> {
    fn drop(&mut self) {
        self.page.remove(&self.field);
    }
}

/// Copy via a temporary selected text field.
pub fn legacy_copy<P: Page>(page: &P, text: &str) -> Result<(), CopyError> {
    let scratch = ScratchField::create(page, text)?;
    page.copy_selection(&scratch.field)
}

/// Copy `text` to the system clipboard.
///
/// A missing or rejecting Clipboard API falls through to the legacy path; the
/// error of the last attempt is returned.
pub async fn copy_text<P: Page>(page: &P, text: &str) -> Result<(), CopyError> {
    let Some(write) = page.clipboard_write(text) else {
        return legacy_copy(page, text);
    };

    match write.await {
        Ok(()) => Ok(()),
        Err(e) => {
            page.warn(&format!("[prompt-button] {}, trying legacy copy", e));
            legacy_copy(page, text)
        }
    }
}
