//! Docsmith - Document-to-Markdown Conversion Library
//!
//! Docsmith converts documents of many formats (HTML, Office documents,
//! PDFs, images, audio, plain text) to Markdown through one pipeline with a
//! uniform result type. Sources can be local paths, URLs, or already-fetched
//! HTTP responses.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docsmith::{ConvertOptions, MarkdownPipeline};
//!
//! # fn main() -> docsmith::Result<()> {
//! let pipeline = MarkdownPipeline::new();
//! let result = pipeline.convert_path_sync("report.docx", &ConvertOptions::default())?;
//! println!("{}", result.text_content);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core** (`core`): the pipeline, format-hint collection, response
//!   materialization, and the priority-ordered converter registry
//! - **Converters** (`converters`): one small struct per format, selected
//!   per candidate extension with a three-way outcome (convert, decline,
//!   fail)
//! - **Capabilities** (`capabilities`): trait seams for side services
//!   (speech transcription, OCR, vision captioning, metadata reading) that
//!   callers inject on the pipeline builder
//! - **Extraction** (`extraction`): format parsers shared by the Office
//!   converters
//!
//! # Format Identity
//!
//! Formats are identified by layered candidate extensions, never by one
//! signal: the caller's explicit hint, then the path suffix (or HTTP
//! headers and URL path for fetched documents), then magic bytes. Every
//! candidate is offered to every converter in priority order, so one wrong
//! signal degrades to a retry instead of a failure.

#![deny(unsafe_code)]

pub mod capabilities;
pub mod converters;
pub mod core;
pub mod error;
pub mod extraction;
pub mod text;
pub mod types;

pub use error::{DocsmithError, Result};
pub use types::{ConversionResult, DocumentSource};

pub use core::config::ConvertOptions;
pub use core::materialize::FetchedResponse;
pub use core::pipeline::{MarkdownPipeline, PipelineBuilder};
pub use core::registry::ConverterRegistry;

pub use converters::DocumentConverter;

pub use text::normalize_markdown;
