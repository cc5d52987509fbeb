//! Convolab Core - Raster data structures
//!
//! This crate provides the image container shared by every other convolab
//! crate:
//!
//! - [`PixelBuffer`] / [`PixelBufferMut`] - four-channel RGBA raster
//!   (immutable / mutable)
//! - [`Rgba`] - a single pixel value
//!
//! # Pixel layout
//!
//! Pixels are stored row-major, four bytes per pixel in R, G, B, A order,
//! so the byte array of a `width x height` buffer is always
//! `width * height * 4` long.

pub mod buffer;
pub mod error;

pub use buffer::{PixelBuffer, PixelBufferMut, Rgba};
pub use error::{Error, Result};

/// Channel indices within a four-byte pixel.
pub mod channel {
    /// Red channel (byte 0)
    pub const RED: usize = 0;
    /// Green channel (byte 1)
    pub const GREEN: usize = 1;
    /// Blue channel (byte 2)
    pub const BLUE: usize = 2;
    /// Alpha channel (byte 3)
    pub const ALPHA: usize = 3;

    /// Number of bytes per pixel
    pub const COUNT: usize = 4;

    /// The color channels, in storage order. Alpha is deliberately absent.
    pub const COLOR: [usize; 3] = [RED, GREEN, BLUE];
}
