//! Injectable side services used by converters.
//!
//! Some converters need more than the document bytes: audio needs a speech
//! transcriber, images can use OCR, a vision model, and a metadata reader.
//! None of these are built here. Each is a trait seam; callers inject
//! implementations on the pipeline builder and converters consume whatever
//! was provided.
//!
//! A converter that owns an extension but is missing a hard requirement
//! (audio without a transcriber) fails with
//! [`DocsmithError::MissingCapability`]; soft signals (image metadata, OCR,
//! captioning) are simply skipped when absent.
//!
//! # Thread Safety
//!
//! All capability traits require `Send + Sync`: implementations are stored
//! in `Arc<dyn Trait>` and called concurrently with `&self`. Use interior
//! mutability (`Mutex`, atomics) for any mutable state.
//!
//! [`DocsmithError::MissingCapability`]: crate::DocsmithError::MissingCapability

mod exiftool;

pub use exiftool::ExifToolReader;

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Mutex;

use ahash::AHasher;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::error::DocsmithError;

/// Speech-to-text backend for audio conversion.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use docsmith::Result;
/// use docsmith::capabilities::SpeechTranscriber;
/// use std::path::Path;
///
/// struct FixedTranscriber;
///
/// #[async_trait]
/// impl SpeechTranscriber for FixedTranscriber {
///     async fn transcribe(&self, _audio: &Path) -> Result<String> {
///         Ok("nineteen oh six".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribe the audio file at `path` to plain text.
    ///
    /// Return an empty string when the audio contains no recognizable
    /// speech; reserve errors for the backend actually breaking.
    async fn transcribe(&self, path: &Path) -> Result<String>;
}

/// Cache of finished transcripts, keyed by content identity.
///
/// Transcription is the slowest step in the pipeline, so the audio converter
/// consults this cache before invoking the transcriber and stores the result
/// afterwards. Keys come from [`content_hash`], so renaming or re-fetching
/// the same bytes still hits.
pub trait TranscriptCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, transcript: &str);
}

/// In-memory [`TranscriptCache`] backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryTranscriptCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTranscriptCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptCache for MemoryTranscriptCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn put(&self, key: &str, transcript: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), transcript.to_string());
    }
}

/// Compute a content-identity hash string from raw bytes.
///
/// Used as the [`TranscriptCache`] key.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = AHasher::default();
    data.hash(&mut hasher);
    let hash = hasher.finish();
    format!("{:016x}", hash)
}

/// One piece of text found in an image by an OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrDetection {
    pub text: String,
    /// Engine confidence in `0.0..=1.0`; filtered against
    /// `ConvertOptions::ocr_min_confidence`.
    pub confidence: f32,
}

/// OCR backend for image conversion.
///
/// Backends can be native Rust engines, subprocess wrappers, or cloud
/// services. Implementations typically report failures with
/// [`DocsmithError::Ocr`].
///
/// [`DocsmithError::Ocr`]: crate::DocsmithError::Ocr
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text regions in the image at `path`.
    async fn recognize(&self, path: &Path) -> Result<Vec<OcrDetection>>;
}

/// Chat-style vision model used to caption images.
///
/// The image converter builds an OpenAI-shaped message payload (user role,
/// one text part with the prompt, one image part with a base64 data URI) and
/// hands it to [`create`]. [`extract_text`] pulls the caption back out of
/// the response; the default implementation reads
/// `choices[0].message.content` and can be overridden for APIs with a
/// different response shape.
///
/// [`create`]: VisionModelClient::create
/// [`extract_text`]: VisionModelClient::extract_text
#[async_trait]
pub trait VisionModelClient: Send + Sync {
    /// Send one chat completion request; `messages` is the JSON array for
    /// the request body.
    async fn create(&self, messages: Value) -> Result<Value>;

    /// Extract the generated caption from a [`create`] response.
    ///
    /// [`create`]: VisionModelClient::create
    fn extract_text(&self, response: &Value) -> Result<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                DocsmithError::validation("vision model response carried no message content")
            })
    }
}

/// Best-effort document metadata reader.
///
/// Returns `None` whenever metadata cannot be produced (tool not installed,
/// unreadable file, malformed output). By contract this trait never errors;
/// metadata is a bonus signal, not a requirement.
#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Read metadata fields for the file at `path`.
    async fn read(&self, path: &Path) -> Option<serde_json::Map<String, Value>>;
}
