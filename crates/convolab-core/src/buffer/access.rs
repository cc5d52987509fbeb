//! Pixel access functions
//!
//! Getting and setting individual pixels. Coordinates are `(x, y)` with the
//! origin at the top-left corner.

use super::{PixelBuffer, PixelBufferMut, Rgba};
use crate::channel;
use crate::error::{Error, Result};

#[inline]
fn offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * channel::COUNT
}

impl PixelBuffer {
    /// Get the pixel at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get the pixel at (x, y) without a bounds check.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> Rgba {
        let i = offset(self.width(), x, y);
        Rgba::from_slice(&self.as_bytes()[i..i + channel::COUNT])
    }

    /// Get the pixel nearest to a possibly out-of-range coordinate.
    ///
    /// Each coordinate is clamped into the image independently, so points
    /// beyond a corner read the corner pixel.
    #[inline]
    pub fn get_pixel_clamped(&self, x: i64, y: i64) -> Rgba {
        let cx = x.clamp(0, self.width() as i64 - 1) as u32;
        let cy = y.clamp(0, self.height() as i64 - 1) as u32;
        self.get_pixel_unchecked(cx, cy)
    }
}

impl PixelBufferMut {
    /// Get the pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = offset(self.width(), x, y);
        Some(Rgba::from_slice(&self.as_bytes()[i..i + channel::COUNT]))
    }

    /// Set the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: Rgba) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_pixel_unchecked(x, y, value);
        Ok(())
    }

    /// Set the pixel at (x, y) without a bounds check.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: Rgba) {
        let i = offset(self.width(), x, y);
        self.as_bytes_mut()[i..i + channel::COUNT].copy_from_slice(&value.to_array());
    }

    /// Set a pixel if it lies inside the buffer; silently ignore it otherwise.
    ///
    /// Convenient for rasterizing shapes that may cross the image border.
    #[inline]
    pub fn put_pixel_clipped(&mut self, x: i64, y: i64, value: Rgba) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.set_pixel_unchecked(x as u32, y as u32, value);
        }
    }
}
