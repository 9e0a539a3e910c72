//! Layered format hint collection.
//!
//! Converters are selected by candidate file extension, and this module is
//! where candidates come from. Signals are layered in priority order: the
//! caller's explicit hint, then path-derived suffixes, then content
//! sniffing (magic bytes), then declared metadata (HTTP headers). A missing
//! signal is skipped silently; hint collection itself never fails.
//!
//! The produced list may contain duplicates. A duplicate costs one
//! redundant dispatch pass and nothing else, so candidates are kept exactly
//! as collected to keep attempt order predictable.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap};
use tokio::io::AsyncReadExt;
use url::Url;

use crate::core::config::ConvertOptions;

/// Number of leading bytes read for magic-byte sniffing.
const SNIFF_BUFFER_SIZE: usize = 8192;

static FILENAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"filename=([^;]+)").expect("filename regex pattern is valid and should compile")
});

/// Append a candidate extension, skipping absent or blank values.
pub fn append_extension(extensions: &mut Vec<String>, candidate: Option<String>) {
    if let Some(ext) = candidate {
        let ext = ext.trim();
        if !ext.is_empty() {
            extensions.push(ext.to_string());
        }
    }
}

/// The `.suffix` of a filesystem path, when it has one.
pub fn path_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
}

/// Guess an extension from the file's leading magic bytes.
///
/// Reads up to the first 8 KiB; unreadable files and unrecognized content
/// both yield `None`.
pub async fn sniff_extension(path: &Path) -> Option<String> {
    let file = tokio::fs::File::open(path).await.ok()?;
    let mut buffer = Vec::with_capacity(SNIFF_BUFFER_SIZE);
    file.take(SNIFF_BUFFER_SIZE as u64)
        .read_to_end(&mut buffer)
        .await
        .ok()?;
    infer::get(&buffer).map(|kind| format!(".{}", kind.extension()))
}

/// Extension guessed from a `Content-Type` header value.
pub fn content_type_extension(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let mime = content_type.split(';').next()?.trim();
    mime_guess::get_mime_extensions_str(mime)
        .and_then(|exts| exts.first())
        .map(|ext| format!(".{}", ext))
}

/// Extension of the filename declared in a `Content-Disposition` header.
pub fn content_disposition_extension(headers: &HeaderMap) -> Option<String> {
    let disposition = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    let captures = FILENAME_REGEX.captures(disposition)?;
    let filename = captures.get(1)?.as_str().trim().trim_matches(['"', '\'']);
    path_extension(Path::new(filename))
}

/// Extension of the path component of a URL.
pub fn url_path_extension(url: &Url) -> Option<String> {
    path_extension(Path::new(url.path()))
}

/// Candidate extensions for a local file: explicit hint, path suffix, magic
/// bytes.
pub async fn candidates_for_path(path: &Path, options: &ConvertOptions) -> Vec<String> {
    let mut extensions = Vec::new();
    append_extension(&mut extensions, options.file_extension.clone());
    append_extension(&mut extensions, path_extension(path));
    append_extension(&mut extensions, sniff_extension(path).await);
    extensions
}

/// Candidate extensions for a fetched response: explicit hint, content
/// type, content-disposition filename, URL path.
///
/// The magic-bytes candidate is appended separately once the body has been
/// spooled to disk.
pub fn candidates_for_response(
    url: &Url,
    headers: &HeaderMap,
    options: &ConvertOptions,
) -> Vec<String> {
    let mut extensions = Vec::new();
    append_extension(&mut extensions, options.file_extension.clone());
    append_extension(&mut extensions, content_type_extension(headers));
    append_extension(&mut extensions, content_disposition_extension(headers));
    append_extension(&mut extensions, url_path_extension(url));
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::io::Write;

    #[test]
    fn test_append_skips_none_and_blank() {
        let mut extensions = Vec::new();
        append_extension(&mut extensions, None);
        append_extension(&mut extensions, Some("   ".to_string()));
        append_extension(&mut extensions, Some(".html".to_string()));
        assert_eq!(extensions, vec![".html"]);
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let mut extensions = Vec::new();
        append_extension(&mut extensions, Some(".pdf".to_string()));
        append_extension(&mut extensions, Some(".pdf".to_string()));
        assert_eq!(extensions, vec![".pdf", ".pdf"]);
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(
            path_extension(Path::new("/tmp/report.PDF")),
            Some(".PDF".to_string())
        );
        assert_eq!(
            path_extension(Path::new("archive.tar.gz")),
            Some(".gz".to_string())
        );
        assert_eq!(path_extension(Path::new("/tmp/README")), None);
    }

    #[test]
    fn test_content_type_extension() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        assert_eq!(content_type_extension(&headers), Some(".pdf".to_string()));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        let ext = content_type_extension(&headers).unwrap();
        assert!(ext.starts_with(".htm"), "unexpected extension {ext}");

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-docsmith-unknown"),
        );
        assert_eq!(content_type_extension(&headers), None);
    }

    #[test]
    fn test_content_disposition_extension() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"quarterly report.xlsx\"; size=1024"),
        );
        assert_eq!(
            content_disposition_extension(&headers),
            Some(".xlsx".to_string())
        );

        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=notes.txt"),
        );
        assert_eq!(
            content_disposition_extension(&headers),
            Some(".txt".to_string())
        );

        headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("inline"));
        assert_eq!(content_disposition_extension(&headers), None);
    }

    #[test]
    fn test_url_path_extension() {
        let url = Url::parse("https://example.com/files/page.html?view=raw").unwrap();
        assert_eq!(url_path_extension(&url), Some(".html".to_string()));

        let url = Url::parse("https://example.com/files/").unwrap();
        assert_eq!(url_path_extension(&url), None);
    }

    #[tokio::test]
    async fn test_sniff_extension_png() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0])
            .unwrap();
        file.flush().unwrap();
        assert_eq!(sniff_extension(file.path()).await, Some(".png".to_string()));
    }

    #[tokio::test]
    async fn test_sniff_extension_misses_silently() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"plain ascii text, nothing magic").unwrap();
        file.flush().unwrap();
        assert_eq!(sniff_extension(file.path()).await, None);

        assert_eq!(
            sniff_extension(Path::new("/nonexistent/docsmith-sniff")).await,
            None
        );
    }

    #[tokio::test]
    async fn test_candidates_for_path_layers_signals() {
        let mut file = tempfile::Builder::new()
            .suffix(".bin")
            .tempfile()
            .unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0])
            .unwrap();
        file.flush().unwrap();

        let options = ConvertOptions {
            file_extension: Some(".dat".to_string()),
            ..Default::default()
        };
        let candidates = candidates_for_path(file.path(), &options).await;
        assert_eq!(candidates, vec![".dat", ".bin", ".png"]);
    }

    #[test]
    fn test_candidates_for_response_layers_signals() {
        let url = Url::parse("https://example.com/download/report.html").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=report.xlsx"),
        );

        let candidates = candidates_for_response(&url, &headers, &ConvertOptions::default());
        assert_eq!(candidates, vec![".pdf", ".xlsx", ".html"]);
    }
}
