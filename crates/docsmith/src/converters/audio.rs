//! Audio conversion.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::capabilities::{SpeechTranscriber, TranscriptCache, content_hash};
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::error::DocsmithError;
use crate::types::ConversionResult;

const AUDIO_EXTENSIONS: &[&str] = &[".wav", ".mp3"];

/// Converter for audio files.
///
/// Owns `.wav` and `.mp3`: without a configured [`SpeechTranscriber`] the
/// conversion is a failure, not a decline, so the caller learns what is
/// missing instead of getting an unsupported-format report. Transcripts
/// are cached by content hash because transcription dominates the
/// pipeline's running time.
pub struct AudioConverter {
    transcriber: Option<Arc<dyn SpeechTranscriber>>,
    cache: Option<Arc<dyn TranscriptCache>>,
}

impl AudioConverter {
    pub fn new(
        transcriber: Option<Arc<dyn SpeechTranscriber>>,
        cache: Option<Arc<dyn TranscriptCache>>,
    ) -> Self {
        Self { transcriber, cache }
    }

    async fn transcript_for(
        &self,
        path: &Path,
        transcriber: &Arc<dyn SpeechTranscriber>,
    ) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let key = content_hash(&bytes);

        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get(&key)
        {
            tracing::debug!("Transcript cache hit for {}", key);
            return Ok(cached);
        }

        let transcript = transcriber.transcribe(path).await?;
        if let Some(cache) = &self.cache {
            cache.put(&key, &transcript);
        }
        Ok(transcript)
    }
}

#[async_trait]
impl DocumentConverter for AudioConverter {
    fn name(&self) -> &str {
        "audio"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, AUDIO_EXTENSIONS) {
            return Ok(None);
        }

        let Some(transcriber) = &self.transcriber else {
            return Err(DocsmithError::MissingCapability(
                "audio transcription needs a configured speech transcriber".to_string(),
            ));
        };

        let transcript = self.transcript_for(path, transcriber).await?;
        let body = if transcript.is_empty() {
            "[No speech detected]"
        } else {
            transcript.as_str()
        };

        Ok(Some(ConversionResult::untitled(format!(
            "### Audio Transcript:\n{}",
            body
        ))))
    }
}
