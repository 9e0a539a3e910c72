//! YouTube watch-page conversion.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::Result;
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::extraction::html::document_title;
use crate::types::ConversionResult;

const HTML_EXTENSIONS: &[&str] = &[".html", ".htm"];
const YOUTUBE_WATCH_PREFIX: &str = "https://www.youtube.com/watch?";

/// Converter specialized for YouTube watch pages.
///
/// Rendering the raw page HTML would produce megabytes of chrome, so this
/// converter assembles a compact summary instead: the video title, metadata
/// pulled from `<meta>` tags (views, keywords, runtime), and the full
/// description dug out of the embedded `ytInitialData` JSON blob.
/// Description extraction reaches into page internals and is best-effort;
/// when it breaks, the section is simply omitted.
pub struct YouTubeConverter;

impl YouTubeConverter {
    fn convert_page(html: &str) -> ConversionResult {
        let document = Html::parse_document(html);
        let meta_selector = Selector::parse("meta").expect("meta selector is valid");

        let mut metadata: HashMap<String, String> = HashMap::new();
        if let Some(title) = document_title(html) {
            metadata.insert("title".to_string(), title);
        }
        for meta in document.select(&meta_selector) {
            let element = meta.value();
            for attr_name in ["itemprop", "property", "name"] {
                if let Some(key) = element.attr(attr_name) {
                    metadata.insert(
                        key.to_string(),
                        element.attr("content").unwrap_or_default().to_string(),
                    );
                    break;
                }
            }
        }
        if let Some(description) = extract_description(&document) {
            metadata.insert("description".to_string(), description);
        }

        let mut webpage_text = String::from("# YouTube\n");

        let title = first_of(&metadata, &["title", "og:title", "name"]);
        if let Some(title) = &title {
            webpage_text.push_str(&format!("\n## {}\n", title));
        }

        let mut stats = String::new();
        if let Some(views) = first_of(&metadata, &["interactionCount"]) {
            stats.push_str(&format!("- **Views:** {}\n", views));
        }
        if let Some(keywords) = first_of(&metadata, &["keywords"]) {
            stats.push_str(&format!("- **Keywords:** {}\n", keywords));
        }
        if let Some(runtime) = first_of(&metadata, &["duration"]) {
            stats.push_str(&format!("- **Runtime:** {}\n", runtime));
        }
        if !stats.is_empty() {
            webpage_text.push_str(&format!("\n### Video Metadata\n{}\n", stats));
        }

        if let Some(description) = first_of(&metadata, &["description", "og:description"]) {
            webpage_text.push_str(&format!("\n### Description\n{}\n", description));
        }

        let title = title.or_else(|| document_title(html));
        ConversionResult::new(title, webpage_text)
    }
}

/// First present key, skipping empty values the way a missing tag would be.
fn first_of(metadata: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| metadata.get(*key))
        .filter(|value| !value.is_empty())
        .cloned()
}

/// Pull the full video description out of the `ytInitialData` script blob.
fn extract_description(document: &Html) -> Option<String> {
    let script_selector = Selector::parse("script").expect("script selector is valid");
    let content = document
        .select(&script_selector)
        .map(|script| script.text().collect::<String>())
        .find(|content| content.contains("ytInitialData"))?;

    let first_line = content.lines().next()?;
    let start = first_line.find('{')?;
    let end = first_line.rfind('}')?;
    let data: Value = serde_json::from_str(first_line.get(start..=end)?).ok()?;
    let description = find_key(&data, "attributedDescriptionBodyText")?;
    description
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Depth-first search for the first occurrence of `key` anywhere in `value`.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Array(items) => items.iter().find_map(|item| find_key(item, key)),
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    return Some(v);
                }
                if let Some(found) = find_key(v, key) {
                    return Some(found);
                }
            }
            None
        }
        _ => None,
    }
}

#[async_trait]
impl DocumentConverter for YouTubeConverter {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn convert(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Option<ConversionResult>> {
        if !claims_extension(options, HTML_EXTENSIONS) {
            return Ok(None);
        }
        let claims_url = options
            .url
            .as_deref()
            .is_some_and(|url| url.starts_with(YOUTUBE_WATCH_PREFIX));
        if !claims_url {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path).await?;
        let html = String::from_utf8_lossy(&bytes);
        Ok(Some(Self::convert_page(&html)))
    }
}
