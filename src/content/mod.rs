//! Node content extraction
//!
//! This module turns a fetched node page into a [`NodeDraft`]:
//! - the title and the folder name derived from it
//! - the page content converted to Markdown

mod extractor;
pub mod folder;
mod markdown;

pub use extractor::ContentExtractor;
pub use folder::folder_name;
pub use markdown::{Html2MdConverter, MarkdownConverter};

use std::path::PathBuf;
use url::Url;

/// One node on its way from page to disk
///
/// Owned by exactly one node pipeline; only `markdown` and the folder fields
/// are ever replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDraft {
    /// The detail page this draft was extracted from
    pub url: Url,

    /// Node title as shown on the page
    pub title: String,

    /// Page content as Markdown
    pub markdown: String,

    /// Folder name under the save path
    pub folder_name: String,

    /// `save_path/folder_name`
    pub folder_path: PathBuf,
}

impl NodeDraft {
    /// Moves the draft to a different folder under the same save path
    pub fn rename_folder(&mut self, folder_name: String) {
        self.folder_path = self.folder_path.with_file_name(&folder_name);
        self.folder_name = folder_name;
    }
}
