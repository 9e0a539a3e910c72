//! Image conversion.

use std::fmt::Write as FmtWrite;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::prelude::*;
use serde_json::{Value, json};

use crate::Result;
use crate::capabilities::{MetadataReader, OcrEngine, VisionModelClient};
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::types::ConversionResult;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

const DEFAULT_CAPTION_PROMPT: &str = "Write a detailed caption for this image.";

/// Metadata fields worth surfacing, in output order.
const METADATA_FIELDS: &[&str] = &[
    "Title",
    "Caption",
    "Description",
    "Keywords",
    "Artist",
    "DateTimeOriginal",
    "CreateDate",
    "GPSPosition",
];

/// Converter for still images.
///
/// Builds the result from three independent signals, each used only when
/// its capability is configured: embedded metadata, a vision-model caption,
/// and OCR text. With no capabilities at all the result is empty but still
/// a success, mirroring an image that simply had nothing to say.
pub struct ImageConverter {
    metadata_reader: Option<Arc<dyn MetadataReader>>,
    ocr_engine: Option<Arc<dyn OcrEngine>>,
}

impl ImageConverter {
    pub fn new(
        metadata_reader: Option<Arc<dyn MetadataReader>>,
        ocr_engine: Option<Arc<dyn OcrEngine>>,
    ) -> Self {
        Self {
            metadata_reader,
            ocr_engine,
        }
    }

    async fn caption(
        &self,
        path: &Path,
        extension: &str,
        client: &Arc<dyn VisionModelClient>,
        prompt: Option<&str>,
    ) -> Result<String> {
        let prompt = match prompt {
            Some(p) if !p.trim().is_empty() => p,
            _ => DEFAULT_CAPTION_PROMPT,
        };

        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_ext(extension.trim_start_matches('.'))
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());
        let data_uri = format!(
            "data:{};base64,{}",
            content_type,
            BASE64_STANDARD.encode(&bytes)
        );

        let messages = json!([
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": data_uri } },
                ],
            }
        ]);

        let response = client.create(messages).await?;
        client.extract_text(&response)
    }
}

#[async_trait]
impl DocumentConverter for ImageConverter {
    fn name(&self) -> &str {
        "image"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, IMAGE_EXTENSIONS) {
            return Ok(None);
        }
        let extension = options.file_extension.as_deref().unwrap_or(".jpg");

        let mut markdown = String::new();

        if let Some(reader) = &self.metadata_reader
            && let Some(metadata) = reader.read(path).await
        {
            for field in METADATA_FIELDS {
                if let Some(value) = metadata.get(*field) {
                    let _ = writeln!(markdown, "{}: {}", field, metadata_value_text(value));
                }
            }
        }

        if let Some(client) = &options.mlm_client {
            let caption = self
                .caption(path, extension, client, options.mlm_prompt.as_deref())
                .await?;
            let _ = write!(markdown, "\n# Description:\n{}\n", caption.trim());
        }

        if let Some(engine) = &self.ocr_engine {
            let detections = engine.recognize(path).await?;
            let text = detections
                .iter()
                .filter(|d| d.confidence >= options.ocr_min_confidence)
                .map(|d| d.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.trim().is_empty() {
                let _ = write!(markdown, "\n# Text detected by OCR:\n{}", text.trim());
            }
        }

        Ok(Some(ConversionResult::untitled(markdown)))
    }
}

/// Metadata values print raw for strings and as JSON for everything else,
/// so keyword arrays stay readable.
fn metadata_value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
