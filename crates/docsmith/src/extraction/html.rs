//! HTML to Markdown rendering.
//!
//! This is the shared rendering path: the HTML converter feeds whole
//! documents through it, and the Wikipedia, DOCX, XLSX, and PPTX converters
//! reuse it for fragments and intermediate HTML. Conversion uses the
//! `html-to-markdown-rs` library with metadata extraction disabled; the
//! document title is pulled out separately so results carry it as a field
//! rather than as frontmatter.

use std::borrow::Cow;

use html_to_markdown_rs::{ConversionOptions, PreprocessingOptions, convert as convert_html};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::Result;
use crate::error::DocsmithError;
use crate::types::ConversionResult;

static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>")
        .expect("title regex pattern is valid and should compile")
});
static WHITESPACE_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex pattern is valid and should compile"));

fn conversion_options() -> ConversionOptions {
    ConversionOptions {
        extract_metadata: false,
        hocr_spatial_tables: false,
        preprocessing: PreprocessingOptions {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Render an HTML document or fragment to Markdown.
pub fn render_markdown(html: &str) -> Result<String> {
    convert_html(html, Some(conversion_options()))
        .map_err(|e| DocsmithError::parsing(format!("Failed to convert HTML to Markdown: {}", e)))
}

/// The text of the document's `<title>` element.
///
/// Entity references are unescaped and inner whitespace is collapsed.
/// Returns `None` when the element is absent or empty.
pub fn document_title(html: &str) -> Option<String> {
    let captures = TITLE_REGEX.captures(html)?;
    let raw = captures.get(1)?.as_str();
    let unescaped = quick_xml::escape::unescape(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string());
    let collapsed = WHITESPACE_RUN_REGEX
        .replace_all(&unescaped, " ")
        .trim()
        .to_string();
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Convert a full HTML document: Markdown body plus `<title>` text.
pub fn convert_document(html: &str) -> Result<ConversionResult> {
    let markdown = render_markdown(html)?;
    Ok(ConversionResult::new(document_title(html), markdown))
}
