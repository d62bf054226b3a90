//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with timeouts and user agent
//! - GET requests for listing and node pages, parsed into a [`Document`]
//! - GET requests for raw image bytes
//! - Error classification
//!
//! Every request resolves to either a value or a [`HarvestError`]; transport
//! failures are never swallowed.

use crate::config::CrawlerConfig;
use crate::HarvestError;
use reqwest::{Client, Response};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// A fetched HTML page together with the URL it came from
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    /// Parses an HTML body fetched from `url`
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }

    /// The URL this document was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All elements matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }

    /// The first element matching `selector`, if any
    pub fn select_first<'a>(&'a self, selector: &'a Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url.as_str()).finish()
    }
}

/// HTTP client shared by page and image fetches
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    /// Builds a client with the configured timeouts and user agent
    ///
    /// # Example
    ///
    /// ```no_run
    /// use md_harvest::config::CrawlerConfig;
    /// use md_harvest::crawler::FetchClient;
    ///
    /// let client = FetchClient::new(&CrawlerConfig::default()).unwrap();
    /// ```
    pub fn new(config: &CrawlerConfig) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a page and parses it as HTML
    pub async fn fetch_document(&self, url: &Url) -> Result<Document, HarvestError> {
        let response = self.send(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(Document::parse(url.clone(), &body))
    }

    /// Fetches the raw body of a URL, used for images
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, HarvestError> {
        let response = self.send(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        tracing::debug!("Fetched {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }

    /// Sends a GET request, turning non-success statuses into errors
    async fn send(&self, url: &Url) -> Result<Response, HarvestError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP {} for {}", status.as_u16(), url);
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// Maps a transport error onto the crate's error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> HarvestError {
    tracing::warn!("Request to {} failed: {}", url, error);

    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        HarvestError::Network {
            url: url.to_string(),
            message: format!("Connection failed: {}", error),
        }
    } else {
        HarvestError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
