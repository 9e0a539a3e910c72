//! Spreadsheet conversion.

use std::path::Path;

use async_trait::async_trait;

use crate::Result;
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::extraction::xlsx::extract_markdown;
use crate::types::ConversionResult;

const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];

/// Converter for Excel workbooks.
///
/// Every sheet becomes a `## {name}` section followed by its cells as a
/// Markdown table.
pub struct XlsxConverter;

#[async_trait]
impl DocumentConverter for XlsxConverter {
    fn name(&self) -> &str {
        "xlsx"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, SPREADSHEET_EXTENSIONS) {
            return Ok(None);
        }

        let markdown = extract_markdown(path)?;
        Ok(Some(ConversionResult::untitled(markdown)))
    }
}
