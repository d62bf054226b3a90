//! Crawler module for listing traversal and harvest coordination
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with explicit failure results
//! - Link discovery on listing pages
//! - Sequential pagination
//! - Overall harvest coordination

mod coordinator;
mod fetcher;
mod links;
mod pagination;

pub use coordinator::{harvest, Coordinator};
pub use fetcher::{Document, FetchClient};
pub use links::{extract_links, LinkSelectors, NodeLink, PageResult};
pub use pagination::{Listing, PaginationCrawler};
