//! The converter suite.
//!
//! Each converter is a small struct implementing [`DocumentConverter`].
//! Converters are selected per candidate extension by the pipeline's
//! dispatch loop; the contract is a three-way outcome:
//!
//! - `Ok(None)` - **not applicable**: the converter declines the candidate
//!   (wrong extension, wrong URL shape). Silent; dispatch moves on.
//! - `Ok(Some(result))` - success; dispatch stops.
//! - `Err(e)` - **failure**: the converter owned the candidate and could
//!   not produce output (corrupt payload, missing capability). Recorded by
//!   the pipeline, which keeps trying remaining candidates.
//!
//! Converters must decline cheaply: check the extension (and URL, where
//! relevant) before touching the file.

mod audio;
mod docx;
mod html;
mod image;
#[cfg(feature = "pdf")]
mod pdf;
mod pptx;
mod text;
mod wikipedia;
mod xlsx;
mod youtube;

pub use audio::AudioConverter;
pub use docx::DocxConverter;
pub use html::HtmlConverter;
pub use image::ImageConverter;
#[cfg(feature = "pdf")]
pub use pdf::PdfConverter;
pub use pptx::PptxConverter;
pub use text::PlainTextConverter;
pub use wikipedia::WikipediaConverter;
pub use xlsx::XlsxConverter;
pub use youtube::YouTubeConverter;

use std::path::Path;

use async_trait::async_trait;

use crate::Result;
use crate::core::config::ConvertOptions;
use crate::types::ConversionResult;

/// A document-format-to-Markdown converter.
///
/// Implementations must be `Send + Sync`; they are stored as
/// `Arc<dyn DocumentConverter>` in the registry and called concurrently
/// with `&self`.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Stable human-readable name, used in logs and the CLI listing.
    fn name(&self) -> &str;

    /// Attempt to convert the file at `path`.
    ///
    /// `options.file_extension` carries exactly one candidate extension for
    /// this attempt. Return `Ok(None)` to decline it.
    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>>;
}

/// Case-insensitive membership test of the candidate extension.
pub(crate) fn claims_extension(options: &ConvertOptions, accepted: &[&str]) -> bool {
    options
        .file_extension
        .as_deref()
        .is_some_and(|ext| accepted.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}
