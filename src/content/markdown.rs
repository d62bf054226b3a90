/// Converts an HTML fragment to Markdown text
///
/// Implementations must be deterministic: the same HTML always yields the same
/// Markdown.
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, html: &str) -> String;
}

/// Default converter backed by the `html2md` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Html2MdConverter;

impl MarkdownConverter for Html2MdConverter {
    fn convert(&self, html: &str) -> String {
        html2md::parse_html(html)
    }
}
