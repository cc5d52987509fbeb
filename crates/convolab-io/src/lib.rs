//! convolab-io - Image loading, saving and synthetic sources
//!
//! Reading and writing go through PNG. Sample images come either from disk
//! ([`FileSource`]) or from the built-in [`Pattern`] generators.

mod error;
pub mod format;
pub mod patterns;
pub mod png;
pub mod source;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format_from_bytes, format_for_path};
pub use crate::png::{read_png, write_png};
pub use source::{FileSource, ImageSource, MemorySource, Pattern, load_or_placeholder};

use convolab_core::PixelBuffer;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Read an image file, detecting its format from the file header.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let mut header = [0u8; 8];
    let n = reader.read(&mut header)?;
    let format = detect_format_from_bytes(&header[..n])?;
    reader.seek(SeekFrom::Start(0))?;
    match format {
        ImageFormat::Png => read_png(reader),
    }
}

/// Decode an image held in memory.
pub fn read_image_mem(data: &[u8]) -> IoResult<PixelBuffer> {
    match detect_format_from_bytes(data)? {
        ImageFormat::Png => read_png(Cursor::new(data)),
    }
}

/// Write an image file, choosing the format from the path extension.
pub fn write_image<P: AsRef<Path>>(pix: &PixelBuffer, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let format = format_for_path(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        ImageFormat::Png => write_png(pix, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Encode an image into memory.
pub fn write_image_mem(pix: &PixelBuffer, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Png => write_png(pix, &mut out)?,
    }
    Ok(out)
}
