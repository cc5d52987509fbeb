//! Convolution kernels
//!
//! A [`Kernel`] is a square, odd-sized matrix of signed integer weights with
//! a normalization divisor and the metadata needed to present it. Kernels are
//! validated once, when constructed, and are immutable afterwards.

use crate::{FilterError, FilterResult};
use std::fmt;

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Lookup identifier (e.g. `gaussianBlur`)
    name: String,
    /// Human-facing title (e.g. `Gaussian Blur`)
    display_name: String,
    /// Human-readable explanation
    description: String,
    /// Side length of the square matrix
    size: u32,
    /// Weights (row-major order)
    matrix: Vec<i32>,
    /// Normalization factor applied to the weighted sum
    divisor: f64,
    /// Recenter the result around mid-gray
    centered: bool,
}

impl Kernel {
    /// Create a kernel from a row-major weight slice.
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidKernel`] if `size` is zero or even, or the
    ///   matrix does not hold exactly `size * size` weights.
    /// - [`FilterError::ZeroDivisor`] if `divisor` is zero or not finite.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        size: u32,
        matrix: &[i32],
        divisor: f64,
        centered: bool,
    ) -> FilterResult<Self> {
        let name = name.into();
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "'{name}': size must be odd and >= 1, got {size}"
            )));
        }
        let expected = size as usize * size as usize;
        if matrix.len() != expected {
            return Err(FilterError::InvalidKernel(format!(
                "'{name}': expected {expected} weights for a {size}x{size} matrix, got {}",
                matrix.len()
            )));
        }
        if divisor == 0.0 || !divisor.is_finite() {
            return Err(FilterError::ZeroDivisor { kernel: name });
        }

        Ok(Self {
            name,
            display_name: display_name.into(),
            description: description.into(),
            size,
            matrix: matrix.to_vec(),
            divisor,
            centered,
        })
    }

    /// Create a kernel from matrix rows.
    ///
    /// The side length is taken from the number of rows; every row must have
    /// that many entries.
    pub fn from_rows(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        rows: &[&[i32]],
        divisor: f64,
        centered: bool,
    ) -> FilterResult<Self> {
        let name = name.into();
        let size = rows.len();
        if let Some(bad) = rows.iter().position(|r| r.len() != size) {
            return Err(FilterError::InvalidKernel(format!(
                "'{name}': row {bad} has {} entries, matrix is not square ({size} rows)",
                rows[bad].len()
            )));
        }
        let flat: Vec<i32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::new(
            name,
            display_name,
            description,
            size as u32,
            &flat,
            divisor,
            centered,
        )
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Side length of the matrix.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Distance from the center tap to the matrix edge, `(size - 1) / 2`.
    #[inline]
    pub fn half_width(&self) -> u32 {
        (self.size - 1) / 2
    }

    #[inline]
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Whether results are offset by +128 before clamping.
    #[inline]
    pub fn is_centered(&self) -> bool {
        self.centered
    }

    /// Row-major weights.
    #[inline]
    pub fn matrix(&self) -> &[i32] {
        &self.matrix
    }

    /// Get the weight at column `kx`, row `ky`.
    #[inline]
    pub fn get(&self, kx: u32, ky: u32) -> Option<i32> {
        if kx < self.size && ky < self.size {
            Some(self.matrix[(ky * self.size + kx) as usize])
        } else {
            None
        }
    }

    /// Iterate over matrix rows.
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        self.matrix.chunks_exact(self.size as usize)
    }

    /// Get the sum of all weights.
    pub fn sum(&self) -> i64 {
        self.matrix.iter().map(|&v| v as i64).sum()
    }
}

impl fmt::Display for Kernel {
    /// Renders the matrix one row per line, e.g. `[  1,  2,  1]`, followed
    /// by `÷ 16` when the divisor is not 1.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>3}")).collect();
            write!(f, "[{}]", cells.join(","))?;
        }
        if self.divisor != 1.0 {
            write!(f, "\n\n÷ {}", self.divisor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_size() {
        let err = Kernel::new("even", "Even", "", 2, &[1, 1, 1, 1], 1.0, false).unwrap_err();
        assert!(matches!(err, FilterError::InvalidKernel(_)));

        let err = Kernel::new("empty", "Empty", "", 0, &[], 1.0, false).unwrap_err();
        assert!(matches!(err, FilterError::InvalidKernel(_)));

        let err = Kernel::new("short", "Short", "", 3, &[1; 8], 1.0, false).unwrap_err();
        assert!(matches!(err, FilterError::InvalidKernel(_)));
    }

    #[test]
    fn test_new_rejects_zero_divisor() {
        let err = Kernel::new("z", "Z", "", 1, &[1], 0.0, false).unwrap_err();
        assert!(matches!(err, FilterError::ZeroDivisor { ref kernel } if kernel == "z"));

        let err = Kernel::new("n", "N", "", 1, &[1], f64::NAN, false).unwrap_err();
        assert!(matches!(err, FilterError::ZeroDivisor { .. }));
    }

    #[test]
    fn test_from_rows_non_square() {
        let err = Kernel::from_rows("bad", "Bad", "", &[&[1, 2, 3], &[1, 2]], 1.0, false)
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidKernel(_)));
    }

    #[test]
    fn test_accessors() {
        let k = Kernel::from_rows(
            "g",
            "G",
            "d",
            &[&[1, 2, 1], &[2, 4, 2], &[1, 2, 1]],
            16.0,
            false,
        )
        .unwrap();
        assert_eq!(k.size(), 3);
        assert_eq!(k.half_width(), 1);
        assert_eq!(k.get(1, 1), Some(4));
        assert_eq!(k.get(0, 1), Some(2));
        assert_eq!(k.get(3, 0), None);
        assert_eq!(k.sum(), 16);
        assert_eq!(k.rows().count(), 3);
    }

    #[test]
    fn test_display() {
        let rows: &[&[i32]] = &[&[0, -1, 0], &[-1, 5, -1], &[0, -1, 0]];
        let k = Kernel::from_rows("b", "B", "", rows, 1.0, false).unwrap();
        assert_eq!(k.to_string(), "[  0, -1,  0]\n[ -1,  5, -1]\n[  0, -1,  0]");

        let k = Kernel::new("box", "Box", "", 1, &[9], 9.0, false).unwrap();
        assert_eq!(k.to_string(), "[  9]\n\n÷ 9");
    }
}
