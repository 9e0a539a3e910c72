//! PPTX conversion.

use std::path::Path;

use async_trait::async_trait;

use crate::Result;
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::extraction::pptx::extract_markdown;
use crate::types::ConversionResult;

const PPTX_EXTENSIONS: &[&str] = &[".pptx"];

/// Converter for PowerPoint presentations.
pub struct PptxConverter;

#[async_trait]
impl DocumentConverter for PptxConverter {
    fn name(&self) -> &str {
        "pptx"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, PPTX_EXTENSIONS) {
            return Ok(None);
        }

        let markdown = extract_markdown(path)?;
        Ok(Some(ConversionResult::untitled(markdown)))
    }
}
