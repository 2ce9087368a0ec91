use super::{Entry, FeedReader};
use crate::backend::Backend;
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const MAX_RETRIES: u32 = 2;
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Errors that can occur while loading a category feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request or overall load exceeded its time limit
    #[error("Request timed out")]
    Timeout,
    /// Body could not be mapped to entries by the backend
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// The fetch task panicked before producing a result
    #[error("Fetch task panicked: {0}")]
    TaskPanicked(String),
}

/// Create the shared HTTP client.
///
/// - Limits redirects to 3 hops and rejects loops
/// - Sends a descriptive user agent (Reddit rejects blank ones)
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .user_agent(concat!("shadow-reader/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Fetches category feeds over HTTP and parses them with the active backend.
#[derive(Clone)]
pub struct HttpFeedReader {
    client: reqwest::Client,
    backend: Arc<dyn Backend>,
    backoff: Duration,
}

impl HttpFeedReader {
    pub fn new(client: reqwest::Client, backend: Arc<dyn Backend>) -> Self {
        Self {
            client,
            backend,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Base delay for 5xx retries; doubles on every attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl FeedReader for HttpFeedReader {
    async fn fetch(&self, category: &str) -> Result<Vec<Entry>, FetchError> {
        let url = self.backend.feed_url(category);
        tracing::debug!(category, url = %url, "Fetching category feed");

        let bytes = fetch_bytes(&self.client, &url, self.backoff).await?;
        let entries = self.backend.parse_entries(&bytes)?;

        tracing::debug!(category, count = entries.len(), "Parsed category feed");
        Ok(entries)
    }
}

async fn fetch_bytes(
    client: &reqwest::Client,
    url: &str,
    backoff: Duration,
) -> Result<Vec<u8>, FetchError> {
    let mut retry_count = 0;

    loop {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        let status = response.status();

        // Server errors and rate limiting are retried with exponential backoff
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= MAX_RETRIES {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }

            let delay = backoff * 2u32.pow(retry_count);
            tracing::warn!(
                url = %url,
                status = %status,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Server error, retrying after delay"
            );

            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        return read_limited_bytes(response, MAX_FEED_SIZE).await;
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
