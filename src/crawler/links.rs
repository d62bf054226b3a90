//! Link discovery on listing pages
//!
//! A listing page contributes two things to the crawl: the node detail links
//! it shows (in document order) and, optionally, a link to the next listing
//! page. Both are resolved against the site base, not the listing page URL.

use crate::config::{parse_selector, SelectorConfig};
use crate::crawler::Document;
use crate::url::{resolve_href, BaseUrl};
use crate::ConfigError;
use scraper::{ElementRef, Selector};
use url::Url;

/// Absolute URL of one node detail page
pub type NodeLink = Url;

/// Links found on a single listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Node detail links in document order
    pub node_links: Vec<NodeLink>,

    /// The next listing page, if the pager has one
    pub next_link: Option<Url>,
}

/// Compiled selectors for listing pages
#[derive(Debug, Clone)]
pub struct LinkSelectors {
    node_link: Selector,
    next_page: Selector,
}

impl LinkSelectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            node_link: parse_selector(&config.node_link)?,
            next_page: parse_selector(&config.next_page)?,
        })
    }
}

/// Extracts node links and the next-page link from a listing page
///
/// A page with no matching elements yields an empty result; on the last page
/// of a listing that is the normal termination signal, not an error.
///
/// # Example
///
/// ```
/// use md_harvest::config::SelectorConfig;
/// use md_harvest::crawler::{extract_links, Document, LinkSelectors};
/// use md_harvest::url::BaseUrl;
/// use url::Url;
///
/// let page = Url::parse("http://example.com/list?page=1").unwrap();
/// let doc = Document::parse(
///     page.clone(),
///     r#"<div class="node-teaser"><h2><a href="/node/1">One</a></h2></div>"#,
/// );
/// let selectors = LinkSelectors::from_config(&SelectorConfig::default()).unwrap();
/// let base = BaseUrl::from_url(&page).unwrap();
///
/// let result = extract_links(&doc, &base, &selectors);
/// assert_eq!(result.node_links[0].as_str(), "http://example.com/node/1");
/// assert!(result.next_link.is_none());
/// ```
pub fn extract_links(doc: &Document, base: &BaseUrl, selectors: &LinkSelectors) -> PageResult {
    let node_links = doc
        .select(&selectors.node_link)
        .filter_map(|anchor| resolve_anchor(anchor, base))
        .collect();

    let next_link = doc
        .select_first(&selectors.next_page)
        .and_then(|anchor| resolve_anchor(anchor, base));

    PageResult {
        node_links,
        next_link,
    }
}

fn resolve_anchor(anchor: ElementRef<'_>, base: &BaseUrl) -> Option<Url> {
    let Some(href) = anchor.value().attr("href") else {
        tracing::debug!("Skipping anchor without href");
        return None;
    };

    let resolved = resolve_href(href, base);
    if resolved.is_none() {
        tracing::debug!("Skipping unresolvable href: {}", href);
    }
    resolved
}
