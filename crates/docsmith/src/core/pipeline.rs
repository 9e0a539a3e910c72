//! The conversion pipeline: builder, entry points, dispatch.
//!
//! [`MarkdownPipeline`] owns the converter registry and the shared side
//! services (HTTP client, default vision client) and exposes the public
//! entry points: [`convert`], [`convert_path`], [`convert_url`], and
//! [`convert_response`], plus blocking `_sync` twins for callers without a
//! runtime.
//!
//! # Dispatch
//!
//! Conversion is a nested loop over candidate extensions (hint priority
//! order) and registered converters (most recently registered first). Each
//! attempt gets its own copy of the caller's options with `file_extension`
//! rewritten to the candidate under trial, so converters never see the raw
//! hint list. A success wins immediately and its Markdown is normalized; a
//! decline moves on silently; a failure is recorded and the loop continues,
//! keeping only the most recent failure for the final error. IO and HTTP
//! transport errors are never part of that aggregation and abort the
//! dispatch at once.
//!
//! [`convert`]: MarkdownPipeline::convert
//! [`convert_path`]: MarkdownPipeline::convert_path
//! [`convert_url`]: MarkdownPipeline::convert_url
//! [`convert_response`]: MarkdownPipeline::convert_response

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use url::Url;

use crate::Result;
use crate::capabilities::{
    ExifToolReader, MemoryTranscriptCache, MetadataReader, OcrEngine, SpeechTranscriber,
    TranscriptCache, VisionModelClient,
};
use crate::converters::{
    AudioConverter, DocumentConverter, DocxConverter, HtmlConverter, ImageConverter,
    PlainTextConverter, PptxConverter, WikipediaConverter, XlsxConverter, YouTubeConverter,
};
#[cfg(feature = "pdf")]
use crate::converters::PdfConverter;
use crate::core::config::ConvertOptions;
use crate::core::hints;
use crate::core::materialize::{FetchedResponse, materialize};
use crate::core::registry::ConverterRegistry;
use crate::error::DocsmithError;
use crate::text::normalize_markdown;
use crate::types::{ConversionResult, DocumentSource};

/// Shared Tokio runtime backing the blocking `_sync` wrappers.
///
/// Built once on first use and reused for every call; the `.expect` can only
/// trip on system resource exhaustion, at which point nothing else would
/// work either.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build global Tokio runtime")
});

/// Document-to-Markdown conversion pipeline.
///
/// Construct with [`MarkdownPipeline::new`] for the stock converter suite,
/// or through [`MarkdownPipeline::builder`] to inject capabilities (speech
/// transcriber, OCR engine, vision client, metadata reader) and an HTTP
/// client. Additional converters can be registered afterwards and take
/// priority over the stock ones.
///
/// # Example
///
/// ```rust,no_run
/// use docsmith::{ConvertOptions, MarkdownPipeline};
///
/// # async fn run() -> docsmith::Result<()> {
/// let pipeline = MarkdownPipeline::new();
/// let result = pipeline
///     .convert("report.docx", &ConvertOptions::default())
///     .await?;
/// println!("{}", result.text_content);
/// # Ok(())
/// # }
/// ```
pub struct MarkdownPipeline {
    registry: ConverterRegistry,
    http_client: reqwest::Client,
    vision_client: Option<Arc<dyn VisionModelClient>>,
}

impl MarkdownPipeline {
    /// Pipeline with the stock converter suite and no injected capabilities.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Register an additional converter with highest priority.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        self.registry.register(converter);
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Convert any [`DocumentSource`]: a path, a URL string, or an
    /// already-fetched response.
    pub async fn convert(
        &self,
        source: impl Into<DocumentSource>,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        match source.into() {
            DocumentSource::Path(path) => self.convert_path(path, options).await,
            DocumentSource::Url(url) => self.convert_url(&url, options).await,
            DocumentSource::Response(response) => self.convert_response(response, options).await,
        }
    }

    /// Convert a local file.
    pub async fn convert_path(
        &self,
        path: impl AsRef<Path>,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        let path = path.as_ref();
        let candidates = hints::candidates_for_path(path, options).await;
        self.dispatch(path, &candidates, options).await
    }

    /// Fetch a URL and convert the response.
    ///
    /// `file://` URLs short-circuit to [`convert_path`]; anything else is
    /// fetched with a GET through the pipeline's HTTP client, following
    /// redirects, and a non-success status is reported as a fetch error
    /// before any conversion starts.
    ///
    /// [`convert_path`]: MarkdownPipeline::convert_path
    pub async fn convert_url(&self, url: &str, options: &ConvertOptions) -> Result<ConversionResult> {
        let parsed = Url::parse(url).map_err(|e| {
            DocsmithError::validation_with_source(format!("Invalid URL '{}': {}", url, e), e)
        })?;

        if parsed.scheme() == "file" {
            let path = parsed.to_file_path().map_err(|_| {
                DocsmithError::validation(format!(
                    "Invalid URL '{}': does not name a local file path",
                    url
                ))
            })?;
            return self.convert_path(path, options).await;
        }

        let response = FetchedResponse::get(&self.http_client, parsed).await?;
        self.convert_response(response, options).await
    }

    /// Convert an HTTP response.
    ///
    /// Header and URL candidates are collected before the body is spooled to
    /// a temporary file; the magic-bytes candidate is appended after, once
    /// there are bytes on disk to sniff. The dispatch runs with
    /// `options.url` set to the final response URL so URL-shape converters
    /// see where the document actually came from. The temporary file is
    /// removed when conversion finishes, successfully or not.
    pub async fn convert_response(
        &self,
        response: FetchedResponse,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        let mut candidates = hints::candidates_for_response(response.url(), response.headers(), options);
        let (document, url) = materialize(response).await?;
        hints::append_extension(
            &mut candidates,
            hints::sniff_extension(document.path()).await,
        );

        let mut options = options.clone();
        options.url = Some(url.to_string());
        self.dispatch(document.path(), &candidates, &options).await
    }

    /// Blocking wrapper for [`convert_path`].
    ///
    /// Must not be called from inside a Tokio runtime; async callers use
    /// [`convert_path`] directly.
    ///
    /// [`convert_path`]: MarkdownPipeline::convert_path
    pub fn convert_path_sync(
        &self,
        path: impl AsRef<Path>,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        GLOBAL_RUNTIME.block_on(self.convert_path(path, options))
    }

    /// Blocking wrapper for [`convert_url`].
    ///
    /// [`convert_url`]: MarkdownPipeline::convert_url
    pub fn convert_url_sync(&self, url: &str, options: &ConvertOptions) -> Result<ConversionResult> {
        GLOBAL_RUNTIME.block_on(self.convert_url(url, options))
    }

    async fn dispatch(
        &self,
        path: &Path,
        candidates: &[String],
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        tracing::debug!(
            "Dispatching {:?} with candidate extensions {:?}",
            path,
            candidates
        );

        let mut last_failure = None;
        for extension in candidates {
            for converter in self.registry.iter() {
                let mut attempt = options.clone();
                attempt.file_extension = Some(extension.clone());
                if attempt.mlm_client.is_none() {
                    attempt.mlm_client = self.vision_client.clone();
                }

                match converter.convert(path, &attempt).await {
                    Ok(Some(result)) => {
                        tracing::debug!(
                            "Converter {} handled {:?} as {}",
                            converter.name(),
                            path,
                            extension
                        );
                        return Ok(ConversionResult {
                            title: result.title,
                            text_content: normalize_markdown(&result.text_content),
                        });
                    }
                    Ok(None) => {}
                    // Environment problems are not conversion failures.
                    Err(e @ DocsmithError::Io(_)) | Err(e @ DocsmithError::Fetch(_)) => {
                        return Err(e);
                    }
                    Err(e) => {
                        tracing::warn!("Converter {} failed on {:?}: {}", converter.name(), path, e);
                        last_failure = Some(e);
                    }
                }
            }
        }

        match last_failure {
            Some(failure) => Err(DocsmithError::ConversionFailed {
                path: path.display().to_string(),
                extensions: candidates.to_vec(),
                source: Box::new(failure),
            }),
            None => Err(DocsmithError::UnsupportedFormat {
                path: path.display().to_string(),
                extensions: candidates.to_vec(),
            }),
        }
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`MarkdownPipeline`].
///
/// Every capability is optional. The transcript cache defaults to an
/// in-memory one and the metadata reader to `exiftool` over `PATH`; the
/// transcriber, OCR engine, and vision client stay absent unless injected,
/// in which case the converters that need them decline or skip the
/// corresponding output sections as documented on each converter.
#[derive(Default)]
pub struct PipelineBuilder {
    transcriber: Option<Arc<dyn SpeechTranscriber>>,
    transcript_cache: Option<Arc<dyn TranscriptCache>>,
    ocr_engine: Option<Arc<dyn OcrEngine>>,
    metadata_reader: Option<Arc<dyn MetadataReader>>,
    vision_client: Option<Arc<dyn VisionModelClient>>,
    http_client: Option<reqwest::Client>,
}

impl PipelineBuilder {
    /// Speech-to-text backend for the audio converter.
    pub fn transcriber(mut self, transcriber: Arc<dyn SpeechTranscriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Transcript cache; defaults to [`MemoryTranscriptCache`].
    pub fn transcript_cache(mut self, cache: Arc<dyn TranscriptCache>) -> Self {
        self.transcript_cache = Some(cache);
        self
    }

    /// OCR backend for the image converter.
    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr_engine = Some(engine);
        self
    }

    /// Metadata reader for the image converter; defaults to
    /// [`ExifToolReader`].
    pub fn metadata_reader(mut self, reader: Arc<dyn MetadataReader>) -> Self {
        self.metadata_reader = Some(reader);
        self
    }

    /// Default vision client, injected into every dispatch attempt that did
    /// not set `ConvertOptions::mlm_client` itself.
    pub fn vision_client(mut self, client: Arc<dyn VisionModelClient>) -> Self {
        self.vision_client = Some(client);
        self
    }

    /// HTTP client used by [`MarkdownPipeline::convert_url`].
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the pipeline and register the stock converter suite.
    ///
    /// Registration order is most-generic-first, so after the stack reverses
    /// it the priority order runs from PDF down to plain text, with the
    /// URL-shape converters (Wikipedia, YouTube) ahead of generic HTML.
    pub fn build(self) -> MarkdownPipeline {
        let transcript_cache: Arc<dyn TranscriptCache> = self
            .transcript_cache
            .unwrap_or_else(|| Arc::new(MemoryTranscriptCache::new()));
        let metadata_reader: Arc<dyn MetadataReader> = self
            .metadata_reader
            .unwrap_or_else(|| Arc::new(ExifToolReader::new()));

        let mut registry = ConverterRegistry::new();
        registry.register(Arc::new(PlainTextConverter));
        registry.register(Arc::new(HtmlConverter));
        registry.register(Arc::new(WikipediaConverter));
        registry.register(Arc::new(YouTubeConverter));
        registry.register(Arc::new(DocxConverter));
        registry.register(Arc::new(XlsxConverter));
        registry.register(Arc::new(PptxConverter));
        registry.register(Arc::new(AudioConverter::new(
            self.transcriber,
            Some(transcript_cache),
        )));
        registry.register(Arc::new(ImageConverter::new(
            Some(metadata_reader),
            self.ocr_engine,
        )));
        #[cfg(feature = "pdf")]
        registry.register(Arc::new(PdfConverter));

        MarkdownPipeline {
            registry,
            http_client: self.http_client.unwrap_or_default(),
            vision_client: self.vision_client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_stock_registry_priority_order() {
        let pipeline = MarkdownPipeline::new();
        #[cfg(feature = "pdf")]
        let expected = vec![
            "pdf",
            "image",
            "audio",
            "pptx",
            "xlsx",
            "docx",
            "youtube",
            "wikipedia",
            "html",
            "plain-text",
        ];
        #[cfg(not(feature = "pdf"))]
        let expected = vec![
            "image",
            "audio",
            "pptx",
            "xlsx",
            "docx",
            "youtube",
            "wikipedia",
            "html",
            "plain-text",
        ];
        assert_eq!(pipeline.registry().names(), expected);
    }

    #[test]
    fn test_registered_converter_outranks_stock() {
        struct Custom;

        #[async_trait]
        impl DocumentConverter for Custom {
            fn name(&self) -> &str {
                "custom"
            }

            async fn convert(
                &self,
                _path: &Path,
                _options: &ConvertOptions,
            ) -> Result<Option<ConversionResult>> {
                Ok(None)
            }
        }

        let mut pipeline = MarkdownPipeline::new();
        pipeline.register(Arc::new(Custom));
        assert_eq!(pipeline.registry().names()[0], "custom");
    }

    #[tokio::test]
    async fn test_builder_accepts_custom_http_client() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let pipeline = MarkdownPipeline::builder().http_client(client).build();

        let file = write_temp(".txt", b"still local");
        let result = pipeline
            .convert_path(file.path(), &ConvertOptions::default())
            .await
            .unwrap();
        assert_eq!(result.text_content, "still local");
    }

    #[tokio::test]
    async fn test_convert_path_normalizes_output() {
        let file = write_temp(".txt", b"hello  \r\nworld\n\n\n\nend");
        let pipeline = MarkdownPipeline::new();

        let result = pipeline
            .convert_path(file.path(), &ConvertOptions::default())
            .await
            .unwrap();
        assert_eq!(result.text_content, "hello\nworld\n\nend");
        assert_eq!(result.title, None);
    }

    #[tokio::test]
    async fn test_unclaimed_extension_is_unsupported() {
        let file = write_temp(".xyz123abc", b"payload");
        let pipeline = MarkdownPipeline::new();

        let err = pipeline
            .convert_path(file.path(), &ConvertOptions::default())
            .await
            .unwrap_err();
        match err {
            DocsmithError::UnsupportedFormat { extensions, .. } => {
                assert_eq!(extensions, vec![".xyz123abc"]);
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_hint_falls_back_to_path_extension() {
        let file = write_temp(".txt", b"body text");
        let pipeline = MarkdownPipeline::new();

        let options = ConvertOptions {
            file_extension: Some(".zzz".to_string()),
            ..Default::default()
        };
        let result = pipeline.convert_path(file.path(), &options).await.unwrap();
        assert_eq!(result.text_content, "body text");
    }

    #[tokio::test]
    async fn test_failure_reported_with_latest_source() {
        // Candidate claimed by the xlsx converter, but the bytes are not a
        // workbook: the dispatch must end in ConversionFailed, not
        // UnsupportedFormat.
        let file = write_temp(".xlsx", b"not a spreadsheet");
        let pipeline = MarkdownPipeline::new();

        let err = pipeline
            .convert_path(file.path(), &ConvertOptions::default())
            .await
            .unwrap_err();
        match err {
            DocsmithError::ConversionFailed { source, .. } => {
                assert!(matches!(*source, DocsmithError::Parsing { .. }));
            }
            other => panic!("expected ConversionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_convert_url_rejects_unparseable_url() {
        let pipeline = MarkdownPipeline::new();
        let err = pipeline
            .convert_url("not a url at all", &ConvertOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DocsmithError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_convert_file_url_routes_to_path() {
        let file = write_temp(".txt", b"from a file url");
        let url = Url::from_file_path(file.path()).unwrap();
        let pipeline = MarkdownPipeline::new();

        let result = pipeline
            .convert_url(url.as_str(), &ConvertOptions::default())
            .await
            .unwrap();
        assert_eq!(result.text_content, "from a file url");
    }

    #[test]
    fn test_sync_wrapper_converts() {
        let file = write_temp(".txt", b"sync body");
        let pipeline = MarkdownPipeline::new();

        let result = pipeline
            .convert_path_sync(file.path(), &ConvertOptions::default())
            .unwrap();
        assert_eq!(result.text_content, "sync body");
    }
}
