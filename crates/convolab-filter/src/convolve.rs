//! Convolution operations
//!
//! Direct 2D convolution of an RGBA [`PixelBuffer`] with a [`Kernel`].
//!
//! For every output pixel the R, G and B channels are the weighted sum of the
//! `size x size` neighborhood, divided by the kernel divisor, multiplied by
//! the strength, offset by +128 for centered kernels, clamped to `[0, 255]`
//! and rounded to nearest with ties to even. Alpha is copied from the source
//! pixel and never convolved.
//!
//! Uses replicate (clamp) border handling: taps outside the image read the
//! nearest edge pixel, each coordinate clamped independently, so taps beyond
//! a corner read the corner.

use crate::{FilterError, FilterResult, Kernel, KernelCatalog};
use convolab_core::{PixelBuffer, PixelBufferMut, channel};
use rayon::prelude::*;

/// Offset added to centered kernels so signed differences land on mid-gray.
pub const CENTER_OFFSET: f64 = 128.0;

/// Check that `strength` is a usable scale factor.
///
/// # Errors
///
/// Returns [`FilterError::InvalidStrength`] for negative or NaN values.
pub fn validate_strength(strength: f64) -> FilterResult<f64> {
    if strength.is_nan() || strength < 0.0 {
        return Err(FilterError::InvalidStrength(strength));
    }
    Ok(strength)
}

/// Convolve `pix` with `kernel`, scaling the normalized result by `strength`.
///
/// The input is never modified; a new buffer of the same size is returned.
pub fn apply(pix: &PixelBuffer, kernel: &Kernel, strength: f64) -> FilterResult<PixelBuffer> {
    validate_strength(strength)?;

    let mut out = PixelBufferMut::new(pix.width(), pix.height())?;
    for y in 0..pix.height() {
        convolve_row(pix, kernel, strength, y, out.row_mut(y));
    }
    Ok(out.into())
}

/// Same as [`apply`], with rows distributed over the rayon thread pool.
///
/// Every pixel goes through the same arithmetic as the sequential path, so
/// the output is byte-identical.
pub fn apply_parallel(
    pix: &PixelBuffer,
    kernel: &Kernel,
    strength: f64,
) -> FilterResult<PixelBuffer> {
    validate_strength(strength)?;

    let mut out = PixelBufferMut::new(pix.width(), pix.height())?;
    let stride = out.stride();
    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| convolve_row(pix, kernel, strength, y as u32, row));
    Ok(out.into())
}

/// Same as [`apply`], polling `is_cancelled` before each row.
///
/// Returns `Ok(None)` as soon as `is_cancelled` reports true; no partial
/// buffer is ever returned.
pub fn apply_cancellable<F>(
    pix: &PixelBuffer,
    kernel: &Kernel,
    strength: f64,
    is_cancelled: F,
) -> FilterResult<Option<PixelBuffer>>
where
    F: Fn() -> bool,
{
    validate_strength(strength)?;

    let mut out = PixelBufferMut::new(pix.width(), pix.height())?;
    for y in 0..pix.height() {
        if is_cancelled() {
            return Ok(None);
        }
        convolve_row(pix, kernel, strength, y, out.row_mut(y));
    }
    Ok(Some(out.into()))
}

/// Convolve with a kernel from the built-in catalog.
pub fn apply_named(pix: &PixelBuffer, name: &str, strength: f64) -> FilterResult<PixelBuffer> {
    let kernel = KernelCatalog::builtin().get(name)?;
    apply(pix, &kernel, strength)
}

/// Compute the single output pixel at `(x, y)` as `[r, g, b, a]`.
///
/// # Panics
///
/// Panics if `(x, y)` lies outside the buffer.
pub fn convolve_pixel(
    pix: &PixelBuffer,
    kernel: &Kernel,
    strength: f64,
    x: u32,
    y: u32,
) -> [u8; 4] {
    let sums = weighted_sums(pix, kernel, x, y);
    let alpha = pix.get_pixel_unchecked(x, y).a;
    [
        finish_channel(sums[0], kernel, strength),
        finish_channel(sums[1], kernel, strength),
        finish_channel(sums[2], kernel, strength),
        alpha,
    ]
}

/// Raw weighted R, G, B sums at `(x, y)` before normalization.
///
/// Taps outside the image read the nearest edge pixel. Integer weights
/// times byte samples are accumulated exactly.
pub fn weighted_sums(pix: &PixelBuffer, kernel: &Kernel, x: u32, y: u32) -> [i64; 3] {
    let size = kernel.size();
    let half = kernel.half_width() as i64;
    let weights = kernel.matrix();

    let mut sums = [0i64; 3];
    for ky in 0..size {
        let sy = y as i64 + ky as i64 - half;
        for kx in 0..size {
            let weight = weights[(ky * size + kx) as usize] as i64;
            if weight == 0 {
                continue;
            }
            let sx = x as i64 + kx as i64 - half;
            let px = pix.get_pixel_clamped(sx, sy);
            sums[0] += px.r as i64 * weight;
            sums[1] += px.g as i64 * weight;
            sums[2] += px.b as i64 * weight;
        }
    }
    sums
}

/// Normalize, scale, recenter, clamp and round one channel sum.
#[inline]
fn finish_channel(sum: i64, kernel: &Kernel, strength: f64) -> u8 {
    let mut value = (sum as f64 / kernel.divisor()) * strength;
    if kernel.is_centered() {
        value += CENTER_OFFSET;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

fn convolve_row(pix: &PixelBuffer, kernel: &Kernel, strength: f64, y: u32, out_row: &mut [u8]) {
    for (x, out) in (0..pix.width()).zip(out_row.chunks_exact_mut(channel::COUNT)) {
        out.copy_from_slice(&convolve_pixel(pix, kernel, strength, x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convolab_core::Rgba;

    fn catalog_kernel(name: &str) -> std::sync::Arc<Kernel> {
        KernelCatalog::builtin().get(name).unwrap()
    }

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| {
            Rgba::new(
                (x * 40 + y * 3) as u8,
                (y * 50) as u8,
                (x * y * 7 % 256) as u8,
                (100 + x * 10) as u8,
            )
        })
        .unwrap()
    }

    #[test]
    fn test_identity_reproduces_input() {
        let pix = gradient(6, 5);
        let out = apply(&pix, &catalog_kernel("identity"), 1.0).unwrap();
        assert_eq!(out, pix);
    }

    #[test]
    fn test_alpha_preserved_for_every_kernel() {
        let pix = gradient(5, 4);
        for kernel in KernelCatalog::builtin().iter() {
            for strength in [0.0, 0.5, 1.0, 3.0] {
                let out = apply(&pix, kernel, strength).unwrap();
                for y in 0..4 {
                    for x in 0..5 {
                        assert_eq!(
                            out.get_pixel_unchecked(x, y).a,
                            pix.get_pixel_unchecked(x, y).a,
                            "{} s={strength} ({x},{y})",
                            kernel.name()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_corner_replication() {
        let pix = PixelBuffer::from_fn(3, 3, |x, y| Rgba::gray((10 + x * 30 + y * 70) as u8))
            .unwrap();
        let kernel = catalog_kernel("boxBlur");
        // Taps at (0,0) read {(0,0),(0,0),(1,0),(0,0),(0,0),(1,0),(0,1),(0,1),(1,1)}
        let v = |x: u32, y: u32| pix.get_pixel_unchecked(x, y).r as i64;
        let expected_sum = 4 * v(0, 0) + 2 * v(1, 0) + 2 * v(0, 1) + v(1, 1);
        assert_eq!(weighted_sums(&pix, &kernel, 0, 0), [expected_sum; 3]);

        let out = apply(&pix, &kernel, 1.0).unwrap();
        let expected = (expected_sum as f64 / 9.0).round_ties_even() as u8;
        assert_eq!(out.get_pixel_unchecked(0, 0).r, expected);
    }

    #[test]
    fn test_convolve_pixel_matches_apply() {
        let pix = gradient(7, 6);
        for kernel in KernelCatalog::builtin().iter() {
            let out = apply(&pix, kernel, 1.7).unwrap();
            for y in 0..6 {
                for x in 0..7 {
                    assert_eq!(
                        convolve_pixel(&pix, kernel, 1.7, x, y),
                        out.get_pixel_unchecked(x, y).to_array(),
                        "{} ({x},{y})",
                        kernel.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_sobel_on_horizontal_ramp() {
        // 0, 10, 20, 30, 40 across each row
        let ramp = PixelBuffer::from_fn(5, 3, |x, _| Rgba::gray((x * 10) as u8)).unwrap();
        let sobel_x = catalog_kernel("sobelX");

        // Interior: (30 - 10) * (1 + 2 + 1) = 80, recentered to 208
        assert_eq!(weighted_sums(&ramp, &sobel_x, 2, 1), [80; 3]);
        let out = apply(&ramp, &sobel_x, 1.0).unwrap();
        let row: Vec<u8> = (0..5).map(|x| out.get_pixel_unchecked(x, 1).r).collect();
        // Replicated edges halve the step at both ends: (10 - 0) * 4 = 40
        assert_eq!(row, [168, 208, 208, 208, 168]);
        assert_eq!(out.get_pixel_unchecked(2, 0), Rgba::gray(208));

        let half = apply(&ramp, &sobel_x, 0.5).unwrap();
        assert_eq!(half.get_pixel_unchecked(2, 2), Rgba::gray(168));

        // No vertical gradient
        let flat = apply(&ramp, &catalog_kernel("sobelY"), 1.0).unwrap();
        assert_eq!(flat.get_pixel_unchecked(2, 1), Rgba::gray(128));

        // Falling ramp: (80 - 160) * 4 = -320 clamps to black
        let falling =
            PixelBuffer::from_fn(5, 3, |x, _| Rgba::gray((200 - x * 40) as u8)).unwrap();
        let out = apply(&falling, &sobel_x, 1.0).unwrap();
        assert_eq!(out.get_pixel_unchecked(2, 1), Rgba::gray(0));
    }

    #[test]
    fn test_zero_strength() {
        let pix = gradient(4, 4);
        let blur = apply(&pix, &catalog_kernel("gaussianBlur"), 0.0).unwrap();
        let edge = apply(&pix, &catalog_kernel("edgeDetection"), 0.0).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let b = blur.get_pixel_unchecked(x, y);
                assert_eq!((b.r, b.g, b.b), (0, 0, 0));
                let e = edge.get_pixel_unchecked(x, y);
                assert_eq!((e.r, e.g, e.b), (128, 128, 128));
            }
        }
    }

    #[test]
    fn test_flat_field_edge_detection_is_mid_gray() {
        let pix = PixelBuffer::filled(7, 5, Rgba::new(90, 17, 240, 33)).unwrap();
        let out = apply(&pix, &catalog_kernel("edgeDetection"), 1.0).unwrap();
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(out.get_pixel_unchecked(x, y), Rgba::new(128, 128, 128, 33));
            }
        }
    }

    #[test]
    fn test_rounding_ties_to_even() {
        // 1x1 kernel with divisor 2: 5/2 = 2.5 -> 2, 7/2 = 3.5 -> 4
        let half = Kernel::new("half", "Half", "", 1, &[1], 2.0, false).unwrap();
        let pix = PixelBuffer::from_raw(2, 1, vec![5, 7, 1, 255, 3, 9, 0, 255]).unwrap();
        let out = apply(&pix, &half, 1.0).unwrap();
        assert_eq!(out.as_bytes(), &[2, 4, 0, 255, 2, 4, 0, 255]);
    }

    #[test]
    fn test_clamps_to_channel_range() {
        let pix = PixelBuffer::filled(3, 3, Rgba::rgb(200, 0, 100)).unwrap();
        let out = apply(&pix, &catalog_kernel("identity"), 3.0).unwrap();
        assert_eq!(out.get_pixel_unchecked(1, 1), Rgba::rgb(255, 0, 255));
    }

    #[test]
    fn test_negative_strength_rejected() {
        let pix = gradient(2, 2);
        let err = apply(&pix, &catalog_kernel("identity"), -1.0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidStrength(s) if s == -1.0));
        assert!(validate_strength(f64::NAN).is_err());
        assert_eq!(validate_strength(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pix = gradient(17, 11);
        for kernel in KernelCatalog::builtin().iter() {
            let a = apply(&pix, kernel, 1.3).unwrap();
            let b = apply_parallel(&pix, kernel, 1.3).unwrap();
            assert_eq!(a, b, "{}", kernel.name());
        }
    }

    #[test]
    fn test_cancellable() {
        let pix = gradient(4, 4);
        let kernel = catalog_kernel("sharpen");
        let done = apply_cancellable(&pix, &kernel, 1.0, || false).unwrap();
        assert_eq!(done, Some(apply(&pix, &kernel, 1.0).unwrap()));
        let cancelled = apply_cancellable(&pix, &kernel, 1.0, || true).unwrap();
        assert!(cancelled.is_none());
    }

    #[test]
    fn test_single_pixel_image() {
        let pix = PixelBuffer::filled(1, 1, Rgba::new(50, 60, 70, 80)).unwrap();
        let out = apply(&pix, &catalog_kernel("motionBlur"), 1.0).unwrap();
        assert_eq!(out.get_pixel_unchecked(0, 0), Rgba::new(50, 60, 70, 80));
    }

    #[test]
    fn test_apply_named_unknown() {
        let pix = gradient(2, 2);
        assert!(matches!(
            apply_named(&pix, "nope", 1.0),
            Err(FilterError::UnknownKernel(_))
        ));
    }
}
