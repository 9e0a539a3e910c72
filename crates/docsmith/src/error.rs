//! Error types for docsmith.
//!
//! All fallible operations in the library return [`Result`], backed by the
//! single [`DocsmithError`] enum:
//!
//! - Use `thiserror` for automatic `Error` trait implementation
//! - Preserve error chains with `#[source]` attributes
//! - Include context in error messages (file paths, attempted extensions)
//!
//! # Error Handling Philosophy
//!
//! **Transport and system errors bubble up unchanged:**
//! - `Io` (from `std::io::Error`) and `Fetch` (from `reqwest::Error`)
//! - These indicate real environment problems the caller must see; the
//!   conversion pipeline never swallows them into its failure aggregation
//!
//! **Converter-internal errors feed the dispatch loop:**
//! - `Parsing`, `Validation`, `Ocr`, `MissingCapability` raised inside a
//!   converter are recorded and the loop moves on to the next candidate
//! - When every candidate has been tried, the pipeline reports either
//!   `UnsupportedFormat` (nothing claimed the document) or
//!   `ConversionFailed` (something claimed it and broke, with the most
//!   recent failure attached as the source)
use thiserror::Error;

/// Result type alias using `DocsmithError`.
pub type Result<T> = std::result::Result<T, DocsmithError>;

/// Main error type for all docsmith operations.
///
/// # Variants
///
/// - `Io` - File system and I/O errors (always bubble up)
/// - `Fetch` - HTTP client errors while retrieving a remote document
/// - `Parsing` - Document parsing errors (corrupt files, malformed markup)
/// - `Ocr` - Text recognition errors from an injected OCR engine
/// - `Validation` - Invalid inputs (bad URLs, unusable options)
/// - `Serialization` - JSON serialization/deserialization errors
/// - `MissingCapability` - A converter needed a side service that was not
///   injected (speech transcriber, vision client)
/// - `UnsupportedFormat` - No registered converter claimed any of the
///   guessed extensions
/// - `ConversionFailed` - At least one converter claimed the document but
///   failed; carries the most recent failure
/// - `Other` - Catch-all for uncommon errors
#[derive(Debug, Error)]
pub enum DocsmithError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Could not convert '{path}' to Markdown: the formats {extensions:?} are not supported")]
    UnsupportedFormat { path: String, extensions: Vec<String> },

    #[error(
        "Could not convert '{path}' to Markdown: file type was recognized as {extensions:?}, but conversion failed: {source}"
    )]
    ConversionFailed {
        path: String,
        extensions: Vec<String>,
        #[source]
        source: Box<DocsmithError>,
    },

    #[error("{0}")]
    Other(String),
}

impl From<calamine::Error> for DocsmithError {
    fn from(err: calamine::Error) -> Self {
        DocsmithError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<zip::result::ZipError> for DocsmithError {
    fn from(err: zip::result::ZipError) -> Self {
        DocsmithError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for DocsmithError {
    fn from(err: serde_json::Error) -> Self {
        DocsmithError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl DocsmithError {
    /// Create a Parsing error.
    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parsing error with source.
    pub fn parsing_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parsing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an Ocr error.
    pub fn ocr<S: Into<String>>(message: S) -> Self {
        Self::Ocr {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Ocr error with source.
    pub fn ocr_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Ocr {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }
}
