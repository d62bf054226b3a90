//! Final write of a node
//!
//! Rewrites archived image URLs in the Markdown to their local file names and
//! writes the result into the node folder.

use crate::content::NodeDraft;
use crate::images::ImageRef;
use crate::output::NodeSummary;
use crate::HarvestError;
use regex::Regex;
use std::collections::HashMap;

/// Replaces every occurrence of each archived image URL with its local name
///
/// All URLs are rewritten in a single pass, so a local name that was just
/// inserted is never matched again by another URL (`2.png` renamed to `1.png`
/// next to `1.png` renamed to `2.png`). Where URLs overlap, the longer one
/// wins, so `http://x/a.png` cannot clobber part of `http://x/a.png?v=2`. URLs
/// are matched literally. If the same URL was archived twice, its first local
/// name is used.
///
/// # Example
///
/// ```
/// use md_harvest::images::ImageRef;
/// use md_harvest::output::rewrite_image_urls;
///
/// let refs = vec![ImageRef {
///     original_url: "http://x/a.png?w=1".to_string(),
///     local_name: "1.png".to_string(),
/// }];
/// assert_eq!(rewrite_image_urls("![](http://x/a.png?w=1)", &refs), "![](1.png)");
/// ```
pub fn rewrite_image_urls(markdown: &str, refs: &[ImageRef]) -> String {
    let mut local_names: HashMap<&str, &str> = HashMap::new();
    for image in refs {
        local_names
            .entry(image.original_url.as_str())
            .or_insert(image.local_name.as_str());
    }
    if local_names.is_empty() {
        return markdown.to_string();
    }

    let mut urls: Vec<&str> = local_names.keys().copied().collect();
    urls.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let alternation = urls
        .iter()
        .map(|url| regex::escape(url))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&alternation) {
        Ok(pattern) => pattern
            .replace_all(markdown, |caps: &regex::Captures<'_>| {
                let url = &caps[0];
                local_names.get(url).copied().unwrap_or(url).to_string()
            })
            .into_owned(),
        Err(e) => {
            // Only reachable for URL sets beyond the regex size limit
            tracing::warn!("Falling back to a plain scan for image rewriting: {}", e);
            rewrite_literal(markdown, &urls, &local_names)
        }
    }
}

/// Single left-to-right scan trying the longest URL first at each position
fn rewrite_literal(markdown: &str, urls: &[&str], local_names: &HashMap<&str, &str>) -> String {
    let mut rewritten = String::with_capacity(markdown.len());
    let mut rest = markdown;

    while let Some(c) = rest.chars().next() {
        match urls.iter().find(|url| rest.starts_with(**url)) {
            Some(&url) => {
                rewritten.push_str(local_names.get(url).copied().unwrap_or(url));
                rest = &rest[url.len()..];
            }
            None => {
                rewritten.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    rewritten
}

/// Writes finished nodes to disk
#[derive(Debug, Clone)]
pub struct NodePersister {
    index_file: String,
}

impl NodePersister {
    pub fn new(index_file: impl Into<String>) -> Self {
        Self {
            index_file: index_file.into(),
        }
    }

    /// Rewrites image URLs and writes `<folder_path>/<index_file>`
    ///
    /// # Returns
    ///
    /// * `Ok(NodeSummary)` - The node was written
    /// * `Err(HarvestError::Io)` - The folder or file could not be written
    pub async fn finalize(
        &self,
        mut draft: NodeDraft,
        refs: &[ImageRef],
    ) -> Result<NodeSummary, HarvestError> {
        draft.markdown = rewrite_image_urls(&draft.markdown, refs);

        tokio::fs::create_dir_all(&draft.folder_path)
            .await
            .map_err(|e| HarvestError::io(&draft.folder_path, e))?;

        let path = draft.folder_path.join(&self.index_file);
        tokio::fs::write(&path, draft.markdown.as_bytes())
            .await
            .map_err(|e| HarvestError::io(&path, e))?;

        tracing::info!("\"{}\" saved.", draft.title);

        Ok(NodeSummary {
            title: draft.title,
            folder_name: draft.folder_name,
        })
    }
}
