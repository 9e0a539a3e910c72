//! Per-call conversion options.
//!
//! [`ConvertOptions`] is the knob bag threaded through every conversion. The
//! pipeline clones it once per dispatch attempt and rewrites
//! `file_extension` so each converter sees exactly one candidate extension.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::capabilities::VisionModelClient;

/// Options for a single conversion request.
///
/// All fields are optional overrides; `ConvertOptions::default()` is a valid
/// configuration for every entry point.
///
/// # Example
///
/// ```rust
/// use docsmith::ConvertOptions;
///
/// let options = ConvertOptions {
///     file_extension: Some(".html".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(options.ocr_min_confidence, 0.25);
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Explicit format hint, with leading dot (`".html"`). Highest-priority
    /// candidate; the pipeline also rewrites this field per dispatch attempt.
    #[serde(default)]
    pub file_extension: Option<String>,

    /// Source URL of the document, when it has one. URL-shape converters
    /// (Wikipedia, YouTube) decline without it.
    #[serde(default)]
    pub url: Option<String>,

    /// Vision-model client used for image captioning.
    ///
    /// Note: this field cannot be deserialized from config files. Set it
    /// programmatically, or on the pipeline builder as a default.
    #[serde(skip)]
    pub mlm_client: Option<Arc<dyn VisionModelClient>>,

    /// Caption prompt override for the vision model.
    #[serde(default)]
    pub mlm_prompt: Option<String>,

    /// Minimum confidence for OCR detections to be included in output.
    #[serde(default = "default_ocr_min_confidence")]
    pub ocr_min_confidence: f32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            file_extension: None,
            url: None,
            mlm_client: None,
            mlm_prompt: None,
            ocr_min_confidence: default_ocr_min_confidence(),
        }
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("file_extension", &self.file_extension)
            .field("url", &self.url)
            .field("mlm_client", &self.mlm_client.as_ref().map(|_| ".."))
            .field("mlm_prompt", &self.mlm_prompt)
            .field("ocr_min_confidence", &self.ocr_min_confidence)
            .finish()
    }
}

fn default_ocr_min_confidence() -> f32 {
    0.25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ocr_confidence() {
        let options = ConvertOptions::default();
        assert_eq!(options.ocr_min_confidence, 0.25);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let options: ConvertOptions = serde_json::from_str("{}").unwrap();
        assert!(options.file_extension.is_none());
        assert!(options.url.is_none());
        assert!(options.mlm_client.is_none());
        assert_eq!(options.ocr_min_confidence, 0.25);
    }

    #[test]
    fn test_deserialize_overrides() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"file_extension": ".html", "ocr_min_confidence": 0.5}"#)
                .unwrap();
        assert_eq!(options.file_extension.as_deref(), Some(".html"));
        assert_eq!(options.ocr_min_confidence, 0.5);
    }

    #[test]
    fn test_debug_elides_client() {
        let rendered = format!("{:?}", ConvertOptions::default());
        assert!(rendered.contains("mlm_client"));
        assert!(!rendered.contains("dyn"));
    }
}
