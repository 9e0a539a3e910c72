//! Generic HTML conversion.

use std::path::Path;

use async_trait::async_trait;

use crate::Result;
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::extraction::html::convert_document;
use crate::types::ConversionResult;

const HTML_EXTENSIONS: &[&str] = &[".html", ".htm"];

/// Converter for HTML documents.
///
/// Renders the whole document to Markdown and carries the `<title>` text.
/// Site-specific converters (Wikipedia, YouTube) register after this one
/// and shadow it for the URLs they claim.
pub struct HtmlConverter;

#[async_trait]
impl DocumentConverter for HtmlConverter {
    fn name(&self) -> &str {
        "html"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, HTML_EXTENSIONS) {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path).await?;
        let html = String::from_utf8_lossy(&bytes);
        convert_document(&html).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options_for(extension: &str) -> ConvertOptions {
        ConvertOptions {
            file_extension: Some(extension.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_converts_html_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"<html><head><title>Test Page</title></head>\
              <body><h1>Heading</h1><p>Some <em>emphasis</em>.</p></body></html>",
        )
        .unwrap();
        file.flush().unwrap();

        let result = HtmlConverter
            .convert(file.path(), &options_for(".html"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.title.as_deref(), Some("Test Page"));
        assert!(result.text_content.contains("# Heading"));
        assert!(result.text_content.contains("*emphasis*"));
    }

    #[tokio::test]
    async fn test_claims_htm_too() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<p>short</p>").unwrap();
        file.flush().unwrap();

        assert!(
            HtmlConverter
                .convert(file.path(), &options_for(".htm"))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_declines_other_extensions() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(
            HtmlConverter
                .convert(file.path(), &options_for(".txt"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
