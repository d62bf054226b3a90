//! md-harvest: archive a paginated node listing as Markdown
//!
//! This crate walks a paginated listing site, visits every node detail page it
//! links to, converts the page content to Markdown, archives the images that
//! content references, and writes one folder per node plus a summary index.

pub mod config;
pub mod content;
pub mod crawler;
pub mod images;
pub mod output;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for md-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed page {url}: {message}")]
    MalformedPage { url: String, message: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to transcode image {url}: {message}")]
    Transcode { url: String, message: String },

    #[error("Folder '{folder}' for {url} is already used by another node")]
    FolderCollision { url: String, folder: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("{failed} of {total} nodes failed")]
    Aggregate { failed: usize, total: usize },

    #[error("Crawl cancelled")]
    Cancelled,
}

impl HarvestError {
    /// Wraps an IO error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for md-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use content::{folder_name, NodeDraft};
pub use crawler::{Coordinator, NodeLink, PageResult};
pub use images::ImageRef;
pub use output::{CrawlReport, NodeSummary};
pub use url::BaseUrl;
