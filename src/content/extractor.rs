use crate::config::{parse_selector, SelectorConfig};
use crate::content::folder::{fallback_folder_name, folder_name};
use crate::content::{MarkdownConverter, NodeDraft};
use crate::crawler::Document;
use crate::{ConfigError, HarvestError};
use scraper::Selector;
use std::path::PathBuf;
use std::sync::Arc;

/// Turns a node detail page into a [`NodeDraft`]
pub struct ContentExtractor {
    title: Selector,
    content: Selector,
    converter: Arc<dyn MarkdownConverter>,
    save_path: PathBuf,
}

impl ContentExtractor {
    pub fn new(
        selectors: &SelectorConfig,
        converter: Arc<dyn MarkdownConverter>,
        save_path: PathBuf,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            title: parse_selector(&selectors.title)?,
            content: parse_selector(&selectors.content)?,
            converter,
            save_path,
        })
    }

    /// Reads the title and body of a node page and converts the body to Markdown
    ///
    /// # Errors
    ///
    /// `MalformedPage` if the page has no title element or no content element.
    pub fn extract(&self, doc: &Document) -> Result<NodeDraft, HarvestError> {
        let title = doc
            .select_first(&self.title)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .ok_or_else(|| HarvestError::MalformedPage {
                url: doc.url().to_string(),
                message: "no title element".to_string(),
            })?;

        let body = doc
            .select_first(&self.content)
            .map(|element| element.inner_html())
            .ok_or_else(|| HarvestError::MalformedPage {
                url: doc.url().to_string(),
                message: "no content element".to_string(),
            })?;

        let mut folder = folder_name(&title);
        if folder.is_empty() {
            folder = fallback_folder_name(doc.url());
            tracing::warn!(
                "Title '{}' of {} yields no folder name, using {}",
                title,
                doc.url(),
                folder
            );
        }

        Ok(NodeDraft {
            url: doc.url().clone(),
            markdown: self.converter.convert(&body),
            folder_path: self.save_path.join(&folder),
            folder_name: folder,
            title,
        })
    }
}
