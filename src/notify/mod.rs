//! Notifications and Loading States
//!
//! Toasts, inline error blocks and spinners rendered onto an explicit
//! [`Page`] target.
//!
//! ## Lifecycle
//!
//! 1. [`show_toast`] creates a toast and shows it right away
//! 2. The toast hides itself after the page's toast delay, or when closed
//! 3. Once the hide animation has run, its container leaves the page

mod render;
mod toast;

pub use render::{escape_html, render_alert, render_loading, render_toast};
pub use toast::{AutoDismiss, Severity, Toast, ToastId, ToastPhase, ToastStack, ToastTiming};

use crate::page::Page;

/// Caption used by [`show_loading`] when none is given
pub const DEFAULT_LOADING_TEXT: &str = "Loading...";

/// Show a transient notification
pub fn show_toast<P: Page + ?Sized>(page: &mut P, message: &str, severity: Severity) -> ToastId {
    page.push_toast(Toast::new(message, severity))
}

/// Show an error inline in `target`, or as a danger toast.
///
/// The inline block is persistent. An id that does not resolve falls back to
/// the toast.
pub fn show_error<P: Page + ?Sized>(page: &mut P, message: &str, target: Option<&str>) {
    if let Some(id) = target {
        if page.set_content(id, render_alert(Severity::Danger, message)) {
            return;
        }
        tracing::debug!(target_id = id, "Error target not found, using toast");
    }
    show_toast(page, message, Severity::Danger);
}

pub fn show_success<P: Page + ?Sized>(page: &mut P, message: &str) -> ToastId {
    show_toast(page, message, Severity::Success)
}

/// Replace the content of `target` with a spinner. No-op for unknown ids.
pub fn show_loading<P: Page + ?Sized>(page: &mut P, target: &str, text: Option<&str>) {
    page.set_content(target, render_loading(text.unwrap_or(DEFAULT_LOADING_TEXT)));
}

/// Clear `target`. No-op for unknown ids.
pub fn hide_loading<P: Page + ?Sized>(page: &mut P, target: &str) {
    page.set_content(target, String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Document;

    fn page() -> Document {
        let mut doc = Document::new();
        doc.add_element("tickers");
        doc
    }

    #[test]
    fn test_show_toast_stacks() {
        let mut doc = page();
        let a = show_toast(&mut doc, "one", Severity::Info);
        let b = show_toast(&mut doc, "one", Severity::Info);

        assert_ne!(a, b);
        assert_eq!(doc.toasts().len(), 2);
    }

    #[test]
    fn test_show_error_inline() {
        let mut doc = page();
        show_error(&mut doc, "Ticker not found", Some("tickers"));

        assert_eq!(
            doc.content("tickers"),
            Some(r#"<div class="alert alert-danger">Ticker not found</div>"#)
        );
        assert!(doc.toasts().is_empty());
    }

    #[test]
    fn test_show_error_falls_back_to_toast() {
        let mut doc = page();
        show_error(&mut doc, "no target", None);
        show_error(&mut doc, "missing target", Some("nowhere"));

        let severities: Vec<_> = doc.toasts().iter().map(|t| t.severity).collect();
        assert_eq!(severities, vec![Severity::Danger, Severity::Danger]);
    }

    #[test]
    fn test_show_success() {
        let mut doc = page();
        let id = show_success(&mut doc, "Saved");

        let toast = doc.toasts().get(&id).unwrap();
        assert_eq!(toast.severity, Severity::Success);
        assert_eq!(toast.message, "Saved");
    }

    #[test]
    fn test_loading_round_trip() {
        let mut doc = page();
        show_loading(&mut doc, "tickers", None);
        assert!(doc.content("tickers").unwrap().contains("Loading..."));

        show_loading(&mut doc, "tickers", Some("Fetching holders"));
        assert!(doc.content("tickers").unwrap().contains("Fetching holders"));

        hide_loading(&mut doc, "tickers");
        assert_eq!(doc.content("tickers"), Some(""));
    }

    #[test]
    fn test_loading_unknown_target_is_noop() {
        let mut doc = page();
        show_loading(&mut doc, "missing", None);
        hide_loading(&mut doc, "missing");

        assert_eq!(doc.content("missing"), None);
        assert!(doc.toasts().is_empty());
    }
}
