//! Format-specific extraction helpers shared by the converters.
//!
//! Each submodule turns one source format into Markdown, usually by way of
//! an intermediate HTML document that [`html::render_markdown`] finishes
//! off. The converters in [`crate::converters`] stay thin: they decide
//! applicability and delegate the actual parsing here.

pub mod docx;
pub mod html;
pub mod pptx;
pub mod xlsx;

/// Escape text for embedding in intermediate HTML.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
