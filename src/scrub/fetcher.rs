//! HTTP fetcher for the scrub pipeline
//!
//! This module handles all HTTP requests for the scrubber:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests for browse, category, and item pages
//! - Error classification into a small fetch-error type
//!
//! The fetcher returns page bodies as text; HTML parsing happens in the
//! consuming components so the parsed document never crosses an await point.

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors from fetching a single page
///
/// A fetch error never aborts the pipeline on its own: category extraction
/// degrades to an empty id set and item extraction degrades to a minimal
/// record. Only the browse-index fetch propagates upward.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body text
///
/// Non-2xx responses are errors; the caller decides whether that is fatal
/// (browse index) or degrades (category and item pages).
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })
}
