//! Sequential traversal of a paginated listing
//!
//! Each listing page's URL is only known after the previous page has been
//! parsed, so pages are fetched strictly one after another.

use crate::crawler::links::{extract_links, LinkSelectors, NodeLink};
use crate::crawler::FetchClient;
use crate::url::BaseUrl;
use crate::HarvestError;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Node links collected from a whole listing
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Node links in discovery order, each appearing once
    pub node_links: Vec<NodeLink>,

    /// Number of listing pages fetched
    pub pages_visited: u32,
}

/// Follows "next page" links from a seed, accumulating node links
pub struct PaginationCrawler<'a> {
    fetcher: &'a FetchClient,
    selectors: &'a LinkSelectors,
    max_pages: u32,
}

impl<'a> PaginationCrawler<'a> {
    pub fn new(fetcher: &'a FetchClient, selectors: &'a LinkSelectors, max_pages: u32) -> Self {
        Self {
            fetcher,
            selectors,
            max_pages,
        }
    }

    /// Walks the listing starting at `seed`
    ///
    /// The walk ends when a page has no next link, when the next link points
    /// at a page already visited, or after `max_pages` pages. A node link seen
    /// on an earlier page is not repeated.
    ///
    /// # Errors
    ///
    /// Any failed page fetch fails the whole walk; no partial result is
    /// returned. Cancellation is checked before every fetch.
    pub async fn crawl(
        &self,
        seed: &Url,
        base: &BaseUrl,
        cancel: &CancellationToken,
    ) -> Result<Listing, HarvestError> {
        let mut listing = Listing::default();
        let mut visited_pages = HashSet::new();
        let mut seen_nodes = HashSet::new();
        let mut current = Some(seed.clone());

        while let Some(page_url) = current.take() {
            if cancel.is_cancelled() {
                return Err(HarvestError::Cancelled);
            }

            if listing.pages_visited >= self.max_pages {
                tracing::warn!(
                    "Reached the limit of {} listing pages, not following {}",
                    self.max_pages,
                    page_url
                );
                break;
            }

            visited_pages.insert(page_url.clone());

            let page = {
                let doc = self.fetcher.fetch_document(&page_url).await?;
                extract_links(&doc, base, self.selectors)
            };
            listing.pages_visited += 1;

            tracing::info!(
                "Listing page {} ({}): {} node links",
                listing.pages_visited,
                page_url,
                page.node_links.len()
            );

            for link in page.node_links {
                if seen_nodes.insert(link.clone()) {
                    listing.node_links.push(link);
                } else {
                    tracing::debug!("Node link already collected: {}", link);
                }
            }

            current = match page.next_link {
                Some(next) if visited_pages.contains(&next) => {
                    tracing::warn!("Next page {} was already visited, stopping", next);
                    None
                }
                next => next,
            };
        }

        Ok(listing)
    }
}
