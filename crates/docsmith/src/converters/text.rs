//! Plain text conversion.

use std::path::Path;

use async_trait::async_trait;

use crate::Result;
use crate::converters::DocumentConverter;
use crate::core::config::ConvertOptions;
use crate::types::ConversionResult;

/// Converter for anything with a `text/*` MIME classification.
///
/// Applicability is decided by the candidate extension alone: if
/// `mime_guess` maps it to a `text/*` type (`.txt`, `.md`, `.csv`,
/// `.html`, ...), the file is read as UTF-8 (lossily) and returned as-is.
/// This is the most generic converter; it registers first so every other
/// converter outranks it, and it doubles as the raw fallback when a
/// higher-priority converter fails on a text-like extension.
pub struct PlainTextConverter;

#[async_trait]
impl DocumentConverter for PlainTextConverter {
    fn name(&self) -> &str {
        "plain-text"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        let Some(extension) = options.file_extension.as_deref() else {
            return Ok(None);
        };
        let Some(mime) = mime_guess::from_ext(extension.trim_start_matches('.')).first() else {
            return Ok(None);
        };
        if mime.type_() != mime_guess::mime::TEXT {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path).await?;
        let text_content = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Some(ConversionResult::untitled(text_content)))
    }
}
