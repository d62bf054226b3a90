//! Output module for writing harvested nodes
//!
//! This module handles:
//! - Rewriting image references and writing each node's Markdown
//! - Generating the summary index
//! - Recording run statistics

mod markdown;
mod node_writer;
pub mod stats;

pub use markdown::{format_summary, write_summary};
pub use node_writer::{rewrite_image_urls, NodePersister};
pub use stats::{print_report, CrawlReport, NodeFailure};

/// The durable record of one saved node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub title: String,
    pub folder_name: String,
}
