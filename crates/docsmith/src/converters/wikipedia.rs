//! Wikipedia page conversion.

use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::Result;
use crate::converters::{DocumentConverter, claims_extension};
use crate::core::config::ConvertOptions;
use crate::extraction::html::{convert_document, document_title, render_markdown};
use crate::types::ConversionResult;

const HTML_EXTENSIONS: &[&str] = &[".html", ".htm"];

static WIKIPEDIA_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[a-zA-Z]{2,3}\.wikipedia\.org/")
        .expect("wikipedia url regex pattern is valid and should compile")
});

/// Converter specialized for Wikipedia article pages.
///
/// Claims HTML documents whose source URL is a Wikipedia language
/// subdomain. Instead of rendering the whole page (navigation, sidebars,
/// footers), it renders only the article content div, headed by the page
/// title. Pages without the expected content div fall back to whole
/// document rendering.
pub struct WikipediaConverter;

impl WikipediaConverter {
    fn convert_page(html: &str) -> Result<ConversionResult> {
        let document = Html::parse_document(html);
        let content_selector =
            Selector::parse("div#mw-content-text").expect("content selector is valid");
        let heading_selector =
            Selector::parse("span.mw-page-title-main").expect("heading selector is valid");

        let Some(content) = document.select(&content_selector).next() else {
            return convert_document(html);
        };

        let title = document_title(html);
        let main_title = document
            .select(&heading_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| title.clone());

        let body_markdown = render_markdown(&content.html())?;
        let text_content = match &main_title {
            Some(main_title) => format!("# {}\n\n{}", main_title, body_markdown),
            None => body_markdown,
        };
        Ok(ConversionResult::new(title, text_content))
    }
}

#[async_trait]
impl DocumentConverter for WikipediaConverter {
    fn name(&self) -> &str {
        "wikipedia"
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
            .is_some_and(|url| WIKIPEDIA_URL_REGEX.is_match(url));
        if !claims_url {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path).await?;
        let html = String::from_utf8_lossy(&bytes);
        Self::convert_page(&html).map(Some)
    }
}
