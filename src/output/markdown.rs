//! Summary index generation
//!
//! The summary is a Markdown bullet list linking every saved node's index file,
//! in the order the nodes were discovered.

use crate::output::NodeSummary;
use crate::HarvestError;
use std::path::Path;

/// Formats the summary index
///
/// # Example
///
/// ```
/// use md_harvest::output::{format_summary, NodeSummary};
///
/// let nodes = vec![NodeSummary {
///     title: "Hello, World!".to_string(),
///     folder_name: "hello-world".to_string(),
/// }];
/// assert_eq!(
///     format_summary(&nodes, "index.md"),
///     "* [Hello, World!](hello-world/index.md)\n"
/// );
/// ```
pub fn format_summary(nodes: &[NodeSummary], index_file: &str) -> String {
    let mut md = String::new();
    for node in nodes {
        md.push_str(&format!(
            "* [{}]({}/{})\n",
            node.title, node.folder_name, index_file
        ));
    }
    md
}

/// Writes the summary index to `path`, creating parent directories as needed
pub async fn write_summary(
    path: &Path,
    nodes: &[NodeSummary],
    index_file: &str,
) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| HarvestError::io(parent, e))?;
    }

    let markdown = format_summary(nodes, index_file);
    tokio::fs::write(path, markdown)
        .await
        .map_err(|e| HarvestError::io(path, e))?;

    Ok(())
}
