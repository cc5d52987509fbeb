//! PixelBuffer - The RGBA image container
//!
//! # Ownership model
//!
//! `PixelBuffer` uses `Arc` for cheap cloning (shared ownership) and is
//! never modified in place. To build or edit pixel data, convert to
//! [`PixelBufferMut`] via [`PixelBuffer::try_into_mut`] or
//! [`PixelBuffer::to_mut`], then convert back with `Into<PixelBuffer>`.

mod access;

use crate::channel;
use crate::error::{Error, Result};
use std::sync::Arc;

/// A single RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn from_slice(px: &[u8]) -> Self {
        Self {
            r: px[channel::RED],
            g: px[channel::GREEN],
            b: px[channel::BLUE],
            a: px[channel::ALPHA],
        }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(v: [u8; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Internal buffer data
#[derive(Debug, Clone, PartialEq, Eq)]
struct BufferData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// RGBA bytes, row-major
    pixels: Vec<u8>,
}

impl BufferData {
    fn check_dimensions(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channel::COUNT))
            .ok_or(Error::InvalidDimension { width, height })
    }
}

/// Four-channel raster image
///
/// # Examples
///
/// ```
/// use convolab_core::{PixelBuffer, Rgba};
///
/// let buf = PixelBuffer::filled(4, 3, Rgba::rgb(10, 20, 30)).unwrap();
/// assert_eq!(buf.width(), 4);
/// assert_eq!(buf.height(), 3);
/// assert_eq!(buf.as_bytes().len(), 4 * 3 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    inner: Arc<BufferData>,
}

impl PixelBuffer {
    /// Create a buffer with every byte set to zero (transparent black).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = BufferData::check_dimensions(width, height)?;
        Ok(Self::from_data(BufferData {
            width,
            height,
            pixels: vec![0u8; len],
        }))
    }

    /// Create a buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self> {
        let len = BufferData::check_dimensions(width, height)?;
        let mut pixels = Vec::with_capacity(len);
        for _ in 0..len / channel::COUNT {
            pixels.extend_from_slice(&color.to_array());
        }
        Ok(Self::from_data(BufferData {
            width,
            height,
            pixels,
        }))
    }

    /// Wrap an existing RGBA byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for an empty size and
    /// [`Error::DataLength`] when `pixels.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = BufferData::check_dimensions(width, height)?;
        if pixels.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::from_data(BufferData {
            width,
            height,
            pixels,
        }))
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> Rgba,
    {
        let len = BufferData::check_dimensions(width, height)?;
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y).to_array());
            }
        }
        Ok(Self::from_data(BufferData {
            width,
            height,
            pixels,
        }))
    }

    fn from_data(data: BufferData) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.width as usize * self.inner.height as usize
    }

    /// Always false: a buffer has at least one pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner.pixels
    }

    /// Bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.inner.pixels[start..start + stride]
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * channel::COUNT
    }

    /// Check if two buffers have the same width and height.
    pub fn sizes_equal(&self, other: &PixelBuffer) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Whether both handles point at the same shared data.
    #[inline]
    pub fn ptr_eq(&self, other: &PixelBuffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Try to take unique ownership of the data for mutation.
    ///
    /// Fails (returning `self`) when other handles share the data.
    pub fn try_into_mut(self) -> std::result::Result<PixelBufferMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixelBufferMut { inner: data }),
            Err(arc) => Err(PixelBuffer { inner: arc }),
        }
    }

    /// Create a mutable copy of this buffer.
    pub fn to_mut(&self) -> PixelBufferMut {
        PixelBufferMut {
            inner: BufferData::clone(&self.inner),
        }
    }

    /// Consume the buffer and return its bytes, copying only if shared.
    pub fn into_raw(self) -> Vec<u8> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => data.pixels,
            Err(arc) => arc.pixels.clone(),
        }
    }
}

/// Mutable RGBA image
///
/// Obtained from [`PixelBuffer::try_into_mut`] / [`PixelBuffer::to_mut`]
/// or created directly; freeze it with `Into<PixelBuffer>`.
#[derive(Debug, Clone)]
pub struct PixelBufferMut {
    inner: BufferData,
}

impl PixelBufferMut {
    /// Create a zeroed mutable buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = BufferData::check_dimensions(width, height)?;
        Ok(Self {
            inner: BufferData {
                width,
                height,
                pixels: vec![0u8; len],
            },
        })
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * channel::COUNT
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner.pixels
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.inner.pixels
    }

    /// Get mutable access to a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.inner.pixels[start..start + stride]
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba) {
        let px = color.to_array();
        for chunk in self.inner.pixels.chunks_exact_mut(channel::COUNT) {
            chunk.copy_from_slice(&px);
        }
    }
}

impl From<PixelBufferMut> for PixelBuffer {
    fn from(buf: PixelBufferMut) -> Self {
        PixelBuffer::from_data(buf.inner)
    }
}
