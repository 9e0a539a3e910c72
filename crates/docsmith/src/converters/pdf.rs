//! PDF conversion.

use std::path::Path;

use async_trait::async_trait;
use lopdf::Document;

use crate::Result;
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::error::DocsmithError;
use crate::types::ConversionResult;

const PDF_EXTENSIONS: &[&str] = &[".pdf"];

/// Converter for PDF documents.
///
/// Extracts the text of every page in page order. Layout is not
/// reconstructed; scanned PDFs without a text layer come out empty.
pub struct PdfConverter;

#[async_trait]
impl DocumentConverter for PdfConverter {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, PDF_EXTENSIONS) {
            return Ok(None);
        }

        let document = Document::load(path)
            .map_err(|e| DocsmithError::parsing(format!("Failed to load PDF: {}", e)))?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        let text = document
            .extract_text(&page_numbers)
            .map_err(|e| DocsmithError::parsing(format!("Failed to extract PDF text: {}", e)))?;

        Ok(Some(ConversionResult::untitled(text)))
    }
}
