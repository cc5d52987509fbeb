//! Image format detection
//!
//! Formats are recognized by magic number when reading and by file
//! extension when writing.

use crate::{IoError, IoResult};
use std::path::Path;

/// PNG: 89 50 4E 47 0D 0A 1A 0A
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
        }
    }

    /// Look up a format by file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Detect image format from leading bytes
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.starts_with(PNG_MAGIC) {
        return Ok(ImageFormat::Png);
    }
    Err(IoError::UnsupportedFormat(
        "unrecognized image signature".to_string(),
    ))
}

/// Choose the output format for a path from its extension
pub fn format_for_path(path: &Path) -> IoResult<ImageFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    ImageFormat::from_extension(ext).ok_or_else(|| {
        IoError::UnsupportedFormat(format!("cannot write '{}': unknown extension", path.display()))
    })
}
