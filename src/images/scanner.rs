use regex::Regex;
use std::sync::OnceLock;

/// Markdown image syntax; alt text may be empty
static IMAGE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn image_pattern() -> &'static Regex {
    IMAGE_PATTERN.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.+?)\)").expect("valid image pattern"))
}

/// One image reference found in Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// 1-based position in scan order
    pub index: usize,

    /// The URL exactly as written in the Markdown
    pub original_url: String,
}

/// Finds every `![alt](url)` in scan order
///
/// An optional title after the URL (`![a](u "t")`) is ignored, as are inline
/// `data:` images, which have nothing to download.
///
/// # Example
///
/// ```
/// use md_harvest::images::scan_image_refs;
///
/// let refs = scan_image_refs("![](http://x/a.png) text ![logo](/b.gif)");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].index, 1);
/// assert_eq!(refs[1].original_url, "/b.gif");
/// ```
pub fn scan_image_refs(markdown: &str) -> Vec<ImageCandidate> {
    image_pattern()
        .captures_iter(markdown)
        .filter_map(|caps| {
            let target = caps.get(2)?.as_str();
            let url = target.split_whitespace().next()?;
            let url = url
                .strip_prefix('<')
                .and_then(|u| u.strip_suffix('>'))
                .unwrap_or(url);

            if url.is_empty() || url.starts_with("data:") {
                return None;
            }
            Some(url.to_string())
        })
        .enumerate()
        .map(|(i, original_url)| ImageCandidate {
            index: i + 1,
            original_url,
        })
        .collect()
}
