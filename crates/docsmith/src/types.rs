use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::materialize::FetchedResponse;

/// The result of converting one document to Markdown.
///
/// This is the value every converter produces and every pipeline entry point
/// returns. `text_content` is Markdown (or plain text for formats with no
/// structure to preserve); `title` is whatever the source document declared,
/// when it declared one at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Document title, e.g. the HTML `<title>` text. Not normalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The converted Markdown body.
    pub text_content: String,
}

impl ConversionResult {
    pub fn new(title: Option<String>, text_content: impl Into<String>) -> Self {
        Self {
            title,
            text_content: text_content.into(),
        }
    }

    /// Result with body text and no title.
    pub fn untitled(text_content: impl Into<String>) -> Self {
        Self::new(None, text_content)
    }
}

/// A document source accepted by [`MarkdownPipeline::convert`].
///
/// The pipeline front door takes anything that can become one of these:
/// a filesystem path, a URL string, or an already-fetched HTTP response.
/// `From<&str>` classifies by prefix: `http://`, `https://`, and `file://`
/// are treated as URLs, everything else as a local path.
///
/// [`MarkdownPipeline::convert`]: crate::core::pipeline::MarkdownPipeline::convert
#[derive(Debug)]
pub enum DocumentSource {
    /// A local file.
    Path(PathBuf),
    /// A URL to fetch; parsed and validated at conversion time.
    Url(String),
    /// A response that was already fetched (or assembled in tests).
    Response(FetchedResponse),
}

impl From<&str> for DocumentSource {
    fn from(value: &str) -> Self {
        if value.starts_with("http://")
            || value.starts_with("https://")
            || value.starts_with("file://")
        {
            DocumentSource::Url(value.to_string())
        } else {
            DocumentSource::Path(PathBuf::from(value))
        }
    }
}

impl From<&Path> for DocumentSource {
    fn from(value: &Path) -> Self {
        DocumentSource::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(value: PathBuf) -> Self {
        DocumentSource::Path(value)
    }
}

impl From<FetchedResponse> for DocumentSource {
    fn from(value: FetchedResponse) -> Self {
        DocumentSource::Response(value)
    }
}
