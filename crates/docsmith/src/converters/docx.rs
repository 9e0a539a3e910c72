//! DOCX conversion.

use std::path::Path;

use async_trait::async_trait;

use crate::Result;
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::extraction::docx::extract_html;
use crate::extraction::html::render_markdown;
use crate::types::ConversionResult;

const DOCX_EXTENSIONS: &[&str] = &[".docx"];

/// Converter for Word documents.
///
/// The document body is rebuilt as intermediate HTML and finished by the
/// shared Markdown renderer, so headings, tables, and inline breaks come
/// out the same way they do for native HTML input.
pub struct DocxConverter;

#[async_trait]
impl DocumentConverter for DocxConverter {
    fn name(&self) -> &str {
        "docx"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, DOCX_EXTENSIONS) {
            return Ok(None);
        }

        let html = extract_html(path)?;
        let markdown = render_markdown(&html)?;
        Ok(Some(ConversionResult::untitled(markdown)))
    }
}
