//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building an HTTP client that presents a browser user agent
//! - Building listing-page URLs from a seed and a page index
//! - GET requests that turn a response into a parsed document
//!
//! There is no retry logic. A failed request is reported as a `FetchError`
//! and the caller decides what to skip.

use crate::FetchError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use shelf_scraper::config::DEFAULT_USER_AGENT;
/// use shelf_scraper::crawler::build_http_client;
///
/// let client = build_http_client(DEFAULT_USER_AGENT).unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Appends the page index to a seed URL
///
/// The seed must already end where the number belongs, e.g. `...?page=`.
pub fn page_url(url: &str, page: Option<u32>) -> String {
    match page {
        Some(page) => format!("{}{}", url, page),
        None => url.to_string(),
    }
}

/// Fetches pages and parses them as HTML documents
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher whose requests carry the given user agent
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent)?,
        })
    }

    /// Fetches `url` (with `page` appended when given) and parses the body
    ///
    /// # Returns
    ///
    /// * `Ok(Html)` - The parsed document
    /// * `Err(FetchError::Status)` - The server answered with a non-2xx status
    /// * `Err(FetchError::Transport)` - The request or body read failed
    pub async fn fetch(&self, url: &str, page: Option<u32>) -> Result<Html, FetchError> {
        let target = page_url(url, page);
        let body = self.fetch_body(&target).await?;
        Ok(Html::parse_document(&body))
    }

    /// Sends a GET request and returns the decoded body of a 2xx response
    pub async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
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

        // Decodes using the charset from Content-Type, falling back to UTF-8
        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
