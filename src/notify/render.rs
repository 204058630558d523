//! HTML Rendering
//!
//! Markup for toasts, alerts and loading blocks. Bootstrap 5 classes.

use super::toast::{Severity, Toast};

/// Render a toast inside its own fixed-position container
pub fn render_toast(toast: &Toast) -> String {
    format!(
        concat!(
            r#"<div class="position-fixed top-0 end-0 p-3" style="z-index: 1050">"#,
            r#"<div id="{id}" class="toast align-items-center text-white bg-{severity} border-0" role="alert">"#,
            r#"<div class="d-flex">"#,
            r#"<div class="toast-body">{message}</div>"#,
            r#"<button type="button" class="btn-close btn-close-white me-2 m-auto" data-bs-dismiss="toast"></button>"#,
            "</div></div></div>"
        ),
        id = toast.id,
        severity = toast.severity,
        message = escape_html(&toast.message),
    )
}

/// Persistent inline alert block
pub fn render_alert(severity: Severity, message: &str) -> String {
    format!(
        r#"<div class="alert alert-{}">{}</div>"#,
        severity,
        escape_html(message)
    )
}

/// Spinner with a caption
pub fn render_loading(text: &str) -> String {
    let text = escape_html(text);
    format!(
        concat!(
            r#"<div class="text-center">"#,
            r#"<div class="spinner-border" role="status"><span class="visually-hidden">{text}</span></div>"#,
            r#"<p class="mt-2">{text}</p>"#,
            "</div>"
        ),
        text = text
    )
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
