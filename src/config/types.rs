use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for md-harvest
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub images: ImageConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of listing pages to follow from the seed
    pub max_pages: u32,

    /// Whole-request timeout for every page and image fetch (seconds)
    pub request_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Maximum number of node pipelines in flight; 0 runs all nodes at once
    pub max_concurrent_nodes: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 1000,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_concurrent_nodes: 0,
            user_agent: format!("md-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Image download configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImageConfig {
    /// Lower bound of the random delay before each image fetch (milliseconds)
    pub min_delay_ms: u64,

    /// Upper bound of the random delay before each image fetch (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}

/// CSS selectors describing the listing and node page layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Anchors on a listing page that point at node detail pages
    pub node_link: String,

    /// Anchor on a listing page that points at the next listing page
    pub next_page: String,

    /// Element on a node page holding the node title
    pub title: String,

    /// Element on a node page whose inner HTML becomes the Markdown body
    pub content: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            node_link: ".node-teaser h2 > a".to_string(),
            next_page: ".pager .pager-next > a".to_string(),
            title: "h1".to_string(),
            content: "body".to_string(),
        }
    }
}

/// What to do when two nodes map to the same folder name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append a short hash of the node URL to the later node's folder
    #[default]
    Suffix,

    /// Fail the later node
    Fail,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root directory receiving the summary and one folder per node
    pub save_path: PathBuf,

    /// File name of the summary index inside `save_path`
    pub summary_file: String,

    /// File name of the Markdown document inside each node folder
    pub index_file: String,

    /// Folder-name collision handling
    pub on_collision: CollisionPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            summary_file: "summary.md".to_string(),
            index_file: "index.md".to_string(),
            on_collision: CollisionPolicy::default(),
        }
    }
}

/// `$HOME/Downloads/html2md`, or `./html2md` when HOME is unset
pub fn default_save_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("Downloads").join("html2md"),
        None => PathBuf::from("html2md"),
    }
}
