//! HTTP fetcher implementation
//!
//! This module handles all network access for the crawler:
//! - The `Fetcher` trait the coordinator is generic over
//! - Building HTTP clients with a proper user agent string
//! - GET requests with bounded redirects and timeouts
//! - Classifying failures into `FetchError` variants

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a single page could not be fetched
///
/// A fetch error only ever ends the branch that hit it; the rest of the crawl
/// carries on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Host unreachable for {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed content at {url}: {reason}")]
    MalformedContent { url: String, reason: String },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Unreachable { url, .. }
            | Self::Status { url, .. }
            | Self::Transport { url, .. }
            | Self::MalformedContent { url, .. } => url,
        }
    }

    /// Returns true if the page was reachable but not usable text
    pub fn is_malformed_content(&self) -> bool {
        matches!(self, Self::MalformedContent { .. })
    }

    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Unreachable {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Transport { url, source: error }
        }
    }
}

/// Retrieves the raw content of a page
///
/// Implementations must be shareable across the crawl's concurrent branches.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns its body as text
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeouts and redirect limit
/// * `user_agent` - The user agent identification
///
/// # Example
///
/// ```no_run
/// use sitegraph::config::{CrawlerConfig, UserAgentConfig};
/// use sitegraph::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let redirect = if crawler.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(crawler.max_redirects)
    };

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::from_client(build_http_client(crawler, user_agent)?))
    }

    /// Wraps an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        check_content_type(url, &response)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        String::from_utf8(body.to_vec()).map_err(|_| FetchError::MalformedContent {
            url: url.to_string(),
            reason: "body is not valid UTF-8".to_string(),
        })
    }
}

/// Rejects responses that declare a non-text Content-Type
///
/// A missing header is accepted; the UTF-8 decode decides in that case.
fn check_content_type(url: &Url, response: &Response) -> Result<(), FetchError> {
    let Some(value) = response.headers().get(CONTENT_TYPE) else {
        return Ok(());
    };

    let content_type = value.to_str().unwrap_or("").to_ascii_lowercase();
    if is_text_content_type(&content_type) {
        Ok(())
    } else {
        Err(FetchError::MalformedContent {
            url: url.to_string(),
            reason: format!("expected text content, got '{}'", content_type),
        })
    }
}

/// Returns true for `text/*` and the HTML/XML application types
fn is_text_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    mime.starts_with("text/")
        || mime == "application/xhtml+xml"
        || mime == "application/xml"
        || mime.ends_with("+xml")
}
