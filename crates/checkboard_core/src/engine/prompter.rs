//! Reason prompt collaborator.
//!
//! A regression from the mid column back to the entry column needs a
//! free-text reason. The engine asks for it through this trait so the
//! business rules stay testable without any UI.

/// Source of a reason for a mid -> entry regression.
pub trait Prompter {
    /// Blocks until the user answers. `None` means cancelled.
    fn request_reason(&mut self) -> Option<String>;
}

impl<F> Prompter for F
where
    F: FnMut() -> Option<String>,
{
    fn request_reason(&mut self) -> Option<String> {
        self()
    }
}

/// Asks `prompter` and returns the trimmed reason.
///
/// Whitespace-only answers count as a cancellation.
pub(crate) fn request_trimmed_reason<P: Prompter + ?Sized>(prompter: &mut P) -> Option<String> {
    let reason = prompter.request_reason()?;
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
