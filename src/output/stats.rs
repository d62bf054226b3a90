//! Run statistics
//!
//! A [`CrawlReport`] records what a harvest run did: how many listing pages
//! it walked, which nodes were saved and which failed.

use crate::output::NodeSummary;
use crate::HarvestError;
use std::path::PathBuf;

/// A node whose pipeline failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    /// The node detail page
    pub url: String,

    /// Why the node failed
    pub error: String,
}

/// Outcome of one harvest run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Number of listing pages fetched
    pub pages_visited: u32,

    /// Number of node links discovered
    pub nodes_found: usize,

    /// Saved nodes in discovery order
    pub saved: Vec<NodeSummary>,

    /// Failed nodes in discovery order
    pub failures: Vec<NodeFailure>,

    /// Total images archived across saved nodes
    pub images_saved: usize,

    /// Where the summary index was written
    pub summary_path: PathBuf,
}

impl CrawlReport {
    /// Returns the report, or an aggregate error if any node failed
    pub fn into_result(self) -> Result<Self, HarvestError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(HarvestError::Aggregate {
                failed: self.failures.len(),
                total: self.nodes_found,
            })
        }
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Harvest Report ===\n");

    println!("Overview:");
    println!("  Listing pages visited: {}", report.pages_visited);
    println!("  Nodes found: {}", report.nodes_found);
    println!("  Nodes saved: {}", report.saved.len());
    println!("  Images archived: {}", report.images_saved);
    println!("  Summary: {}", report.summary_path.display());
    println!();

    if !report.failures.is_empty() {
        println!("Failed Nodes ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  - {}: {}", failure.url, failure.error);
        }
        println!();
    }

    let success_rate = if report.nodes_found > 0 {
        (report.saved.len() as f64 / report.nodes_found as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} nodes saved)",
        success_rate,
        report.saved.len(),
        report.nodes_found
    );
}
