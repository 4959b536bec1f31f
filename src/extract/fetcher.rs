//! Page-fetch capability: the HTTP boundary of content extraction.
//!
//! The [`PageFetcher`] trait is what the extractor talks to; the
//! [`HttpPageFetcher`] implementation wraps reqwest with browser-like
//! headers and User-Agent rotation so ordinary news and reference sites
//! serve real markup.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// A fetched page before any extraction.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Value of the Content-Type header, without parameters.
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Failure modes of a single page fetch.
///
/// These are per-source conditions; the extractor folds them into
/// [`crate::types::SourceStatus::Failed`] instead of propagating them.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("http status {0}")]
    Status(u16),
}

/// Page-fetch capability boundary.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieve the raw page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// reqwest-backed fetcher with rotated User-Agent and bounded redirects.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let ua = USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(ua)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Build a fetcher against an explicit base client, used by tests.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").trim().to_lowercase())
            .unwrap_or_default();

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .to_vec();

        Ok(FetchedPage { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>hi</body></html>".as_bytes(), "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(Duration::from_secs(5)).unwrap();
        let page = fetcher
            .fetch_page(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.content_type, "text/html");
        assert!(String::from_utf8_lossy(&page.body).contains("hi"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(Duration::from_secs(5)).unwrap();
        let result = fetcher.fetch_page(&format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let fetcher = HttpPageFetcher::new(Duration::from_millis(500)).unwrap();
        let result = fetcher.fetch_page("http://127.0.0.1:1/never").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn content_type_parameters_are_stripped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("x".as_bytes(), "Application/PDF; name=report"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(Duration::from_secs(5)).unwrap();
        let page = fetcher
            .fetch_page(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.content_type, "application/pdf");
    }
}
