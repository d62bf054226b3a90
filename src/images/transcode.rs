//! Image transcoding
//!
//! The pipeline only needs two things from a transcoder: the bytes to store
//! and the file extension matching them. [`FormatSniffer`] keeps the bytes as
//! downloaded and detects the extension from the file signature.

use thiserror::Error;

/// Errors produced while transcoding an image
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("empty image body")]
    Empty,

    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("transcoding failed: {0}")]
    Failed(String),
}

/// Bytes ready to be written, with their file extension (without the dot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcoded {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Optimizes or normalizes downloaded image bytes
pub trait ImageTranscoder: Send + Sync {
    fn transcode(&self, bytes: Vec<u8>) -> Result<Transcoded, TranscodeError>;
}

/// Keeps image bytes untouched and detects their format
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatSniffer;

impl ImageTranscoder for FormatSniffer {
    fn transcode(&self, bytes: Vec<u8>) -> Result<Transcoded, TranscodeError> {
        if bytes.is_empty() {
            return Err(TranscodeError::Empty);
        }

        let extension = sniff_extension(&bytes).ok_or(TranscodeError::UnknownFormat)?;
        Ok(Transcoded {
            bytes,
            extension: extension.to_string(),
        })
    }
}

/// Detects an image format from its leading bytes
pub fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("gif");
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("webp");
    }
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" && matches!(&bytes[8..12], b"avif" | b"avis")
    {
        return Some("avif");
    }
    if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        return Some("tif");
    }
    if bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return Some("ico");
    }
    if bytes.starts_with(b"BM") {
        return Some("bmp");
    }
    if looks_like_svg(bytes) {
        return Some("svg");
    }
    None
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}
