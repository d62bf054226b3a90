//! Image archiving
//!
//! This module handles the images embedded in a node's Markdown:
//! - Scanning the Markdown for `![alt](url)` references
//! - Downloading each image after a randomized delay
//! - Transcoding and naming it after its position in the Markdown
//! - Writing it into the node folder

mod pipeline;
mod scanner;
pub mod transcode;

pub use pipeline::ImagePipeline;
pub use scanner::{scan_image_refs, ImageCandidate};
pub use transcode::{FormatSniffer, ImageTranscoder, TranscodeError, Transcoded};

/// One archived image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The URL exactly as it appears in the Markdown
    pub original_url: String,

    /// File name inside the node folder, `<index>.<ext>`
    pub local_name: String,
}
