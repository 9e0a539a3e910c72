//! Source materialization: HTTP responses to scoped local files.
//!
//! Converters only ever read local paths. Anything that arrives over the
//! network is spooled to a temporary file first, and the temp file's
//! lifetime is tied to a guard value so it is removed on success, failure,
//! and panic alike. The temp path carries no meaningful suffix; format
//! identity comes from the hint list, never from the spool location.

use std::fmt;
use std::path::Path;

use reqwest::header::HeaderMap;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::Result;

/// An HTTP response ready for conversion.
///
/// Wraps either a live `reqwest` response (streamed to disk on
/// materialization) or an already-buffered body. [`from_parts`] is the seam
/// for tests and for callers that fetched the document themselves;
/// converters never see `reqwest` types.
///
/// The URL is the final one after redirects, which matters for URL-shape
/// converters (a shortened link to a Wikipedia page must dispatch as
/// Wikipedia).
///
/// [`from_parts`]: FetchedResponse::from_parts
pub struct FetchedResponse {
    url: Url,
    headers: HeaderMap,
    body: ResponseBody,
}

enum ResponseBody {
    Streaming(Box<reqwest::Response>),
    Buffered(Vec<u8>),
}

impl FetchedResponse {
    /// GET `url` through `client` and wrap the response.
    ///
    /// Redirects are followed by the client; a non-success status is an
    /// error here, before any conversion work starts.
    pub async fn get(client: &reqwest::Client, url: Url) -> Result<Self> {
        let response = client.get(url).send().await?.error_for_status()?;
        Ok(Self::from_reqwest(response))
    }

    pub fn from_reqwest(response: reqwest::Response) -> Self {
        Self {
            url: response.url().clone(),
            headers: response.headers().clone(),
            body: ResponseBody::Streaming(Box::new(response)),
        }
    }

    /// Assemble a response from its pieces, with a fully buffered body.
    pub fn from_parts(url: Url, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url,
            headers,
            body: ResponseBody::Buffered(body.into()),
        }
    }

    /// Final response URL, after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl fmt::Debug for FetchedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.body {
            ResponseBody::Streaming(_) => "streaming".to_string(),
            ResponseBody::Buffered(bytes) => format!("{} bytes", bytes.len()),
        };
        f.debug_struct("FetchedResponse")
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body", &body)
            .finish()
    }
}

/// A response body spooled to a scoped temporary file.
///
/// The file is removed when this guard drops.
pub struct MaterializedDocument {
    temp: NamedTempFile,
}

impl MaterializedDocument {
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

/// Spool a response body to disk.
///
/// Streaming bodies are written chunk by chunk without buffering the whole
/// document in memory. Returns the guard plus the final URL of the
/// response, which outlives the consumed response value.
pub async fn materialize(response: FetchedResponse) -> Result<(MaterializedDocument, Url)> {
    let temp = tempfile::Builder::new().prefix("docsmith-").tempfile()?;
    let mut file = tokio::fs::File::from_std(temp.reopen()?);

    let url = response.url;
    match response.body {
        ResponseBody::Streaming(mut http) => {
            let mut written = 0usize;
            while let Some(chunk) = http.chunk().await? {
                written += chunk.len();
                file.write_all(&chunk).await?;
            }
            tracing::debug!("Spooled {} bytes from {} to {:?}", written, url, temp.path());
        }
        ResponseBody::Buffered(bytes) => {
            file.write_all(&bytes).await?;
        }
    }
    file.flush().await?;

    Ok((MaterializedDocument { temp }, url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_materialize_buffered_body() {
        let url = Url::parse("https://example.com/doc.txt").unwrap();
        let response = FetchedResponse::from_parts(url.clone(), HeaderMap::new(), b"hello".to_vec());

        let (doc, final_url) = materialize(response).await.unwrap();
        assert_eq!(final_url, url);
        assert_eq!(std::fs::read(doc.path()).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_temp_file_removed_on_drop() {
        let url = Url::parse("https://example.com/doc.bin").unwrap();
        let response = FetchedResponse::from_parts(url, HeaderMap::new(), vec![0u8; 4096]);

        let (doc, _) = materialize(response).await.unwrap();
        let path = doc.path().to_path_buf();
        assert!(path.exists());

        drop(doc);
        assert!(!path.exists());
    }

    #[test]
    fn test_debug_does_not_dump_body() {
        let url = Url::parse("https://example.com/doc.bin").unwrap();
        let response = FetchedResponse::from_parts(url, HeaderMap::new(), vec![1, 2, 3]);
        let rendered = format!("{:?}", response);
        assert!(rendered.contains("3 bytes"));
    }
}
