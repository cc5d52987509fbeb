//! Synthetic test images
//!
//! Deterministic generators for sample images that exercise different parts
//! of a filter: hard edges, smooth ramps, fine texture and curved contours.
//! All generated pixels are opaque.

use convolab_core::{PixelBuffer, PixelBufferMut, Result, Rgba};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default generated image width
pub const DEFAULT_WIDTH: u32 = 400;
/// Default generated image height
pub const DEFAULT_HEIGHT: u32 = 300;
/// Default checkerboard square size
pub const DEFAULT_SQUARE: u32 = 25;
/// Default Mandelbrot iteration limit
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;
/// Default noise seed
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Parse a `#rrggbb` literal at compile time.
const fn hex(rgb: u32) -> Rgba {
    Rgba::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Interpolate across gradient stops at position `t` in `[0, 1]`.
fn gradient_at(stops: &[(f64, Rgba)], t: f64) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let Some(&(_, first)) = stops.first() else {
        return Rgba::default();
    };
    let mut prev = (0.0, first);
    for &(pos, color) in stops {
        if t <= pos {
            let span = pos - prev.0;
            let f = if span > 0.0 { (t - prev.0) / span } else { 0.0 };
            return lerp(prev.1, color, f);
        }
        prev = (pos, color);
    }
    prev.1
}

fn lerp(a: Rgba, b: Rgba, f: f64) -> Rgba {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    Rgba::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

/// Position of `(x, y)` along the line from the origin to `(w, h)`.
fn diagonal_t(x: u32, y: u32, w: u32, h: u32) -> f64 {
    let (w, h) = (w as f64, h as f64);
    (x as f64 * w + y as f64 * h) / (w * w + h * h)
}

fn fill_rect(buf: &mut PixelBufferMut, x0: i64, y0: i64, w: i64, h: i64, color: Rgba) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            buf.put_pixel_clipped(x, y, color);
        }
    }
}

fn fill_circle(buf: &mut PixelBufferMut, cx: f64, cy: f64, r: f64, color: Rgba) {
    let (x0, x1) = ((cx - r).floor() as i64, (cx + r).ceil() as i64);
    let (y0, y1) = ((cy - r).floor() as i64, (cy + r).ceil() as i64);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                buf.put_pixel_clipped(x, y, color);
            }
        }
    }
}

/// Even-odd point-in-polygon test.
fn in_polygon(px: f64, py: f64, poly: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Black and white squares, white where `x / square + y / square` is even.
pub fn checkerboard(width: u32, height: u32, square: u32) -> Result<PixelBuffer> {
    let square = square.max(1);
    PixelBuffer::from_fn(width, height, |x, y| {
        if (x / square + y / square) % 2 == 0 {
            Rgba::gray(255)
        } else {
            Rgba::gray(0)
        }
    })
}

/// Color ramps: a red-green-blue band across the top third and a
/// yellow-magenta-cyan radial gradient below it.
pub fn color_gradients(width: u32, height: u32) -> Result<PixelBuffer> {
    let linear = [
        (0.0, hex(0xff0000)),
        (0.5, hex(0x00ff00)),
        (1.0, hex(0x0000ff)),
    ];
    let radial = [
        (0.0, hex(0xffff00)),
        (0.5, hex(0xff00ff)),
        (1.0, hex(0x00ffff)),
    ];
    let band = height / 3;
    let cx = width as f64 / 2.0;
    let cy = band as f64 + (height - band) as f64 / 2.0;
    let radius = (width.min(height) as f64 / 2.0).max(1.0);

    PixelBuffer::from_fn(width, height, |x, y| {
        if y < band {
            gradient_at(&linear, x as f64 / width as f64)
        } else {
            let d = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
            gradient_at(&radial, d / radius)
        }
    })
}

/// Uniform gray noise from a seeded generator.
pub fn noise(width: u32, height: u32, seed: u64) -> Result<PixelBuffer> {
    let mut rng = StdRng::seed_from_u64(seed);
    PixelBuffer::from_fn(width, height, |_, _| {
        let v: f64 = rng.r#gen::<f64>() * 255.0;
        Rgba::gray(v as u8)
    })
}

/// Mandelbrot escape-time rendering over `[-2, 2] x [-2, 2]`.
///
/// Points inside the set are black; escaping points are shaded by
/// `iterations / max_iterations` with green and blue at 70% and 30% of red.
pub fn mandelbrot(width: u32, height: u32, max_iterations: u32) -> Result<PixelBuffer> {
    let (w, h) = (width as f64, height as f64);
    PixelBuffer::from_fn(width, height, |x, y| {
        let c_re = (x as f64 - w / 2.0) * 4.0 / w;
        let c_im = (y as f64 - h / 2.0) * 4.0 / h;
        let (mut z_re, mut z_im) = (0.0f64, 0.0f64);
        let mut iterations = 0;
        while z_re * z_re + z_im * z_im < 4.0 && iterations < max_iterations {
            let t = z_re * z_re - z_im * z_im + c_re;
            z_im = 2.0 * z_re * z_im + c_im;
            z_re = t;
            iterations += 1;
        }
        let shade = if iterations == max_iterations {
            0.0
        } else {
            iterations as f64 / max_iterations as f64 * 255.0
        };
        Rgba::rgb(shade as u8, (shade * 0.7) as u8, (shade * 0.3) as u8)
    })
}

/// Black rings every 15 pixels around the center plus two filled discs.
pub fn concentric_circles(width: u32, height: u32) -> Result<PixelBuffer> {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let mut buf = PixelBuffer::from_fn(width, height, |x, y| {
        let d = ((x as f64 + 0.5 - cx).powi(2) + (y as f64 + 0.5 - cy).powi(2)).sqrt();
        let on_ring = (10..150)
            .step_by(15)
            .any(|r| (d - r as f64).abs() <= 1.0);
        if on_ring { Rgba::gray(0) } else { Rgba::gray(255) }
    })?
    .to_mut();

    fill_circle(&mut buf, 100.0, 100.0, 30.0, hex(0xff6b6b));
    fill_circle(&mut buf, 300.0, 200.0, 25.0, hex(0x4ecdc4));
    Ok(buf.into())
}

/// A square, a disc and a pentagon over a pink diagonal gradient.
pub fn geometric_shapes(width: u32, height: u32) -> Result<PixelBuffer> {
    let background = [
        (0.0, hex(0xff9a9e)),
        (0.5, hex(0xfecfef)),
        (1.0, hex(0xfecfef)),
    ];
    let pentagon = [
        (200.0, 200.0),
        (250.0, 150.0),
        (300.0, 200.0),
        (275.0, 250.0),
        (225.0, 250.0),
    ];
    let green = hex(0x38a169);

    let mut buf = PixelBuffer::from_fn(width, height, |x, y| {
        if in_polygon(x as f64 + 0.5, y as f64 + 0.5, &pentagon) {
            green
        } else {
            gradient_at(&background, diagonal_t(x, y, width, height))
        }
    })?
    .to_mut();

    fill_rect(&mut buf, 50, 50, 100, 100, hex(0x4a5568));
    fill_circle(&mut buf, 300.0, 100.0, 50.0, hex(0xed8936));
    Ok(buf.into())
}

/// Sepia stand-in used when an external photograph cannot be loaded.
pub fn placeholder(width: u32, height: u32) -> Result<PixelBuffer> {
    let background = [
        (0.0, hex(0xf4f1e8)),
        (0.5, hex(0xe8dcc0)),
        (1.0, hex(0xd4c4a0)),
    ];
    let mut buf = PixelBuffer::from_fn(width, height, |x, y| {
        gradient_at(&background, diagonal_t(x, y, width, height))
    })?
    .to_mut();

    fill_rect(&mut buf, 150, 100, 100, 120, hex(0x654321));
    fill_rect(&mut buf, 175, 110, 50, 40, hex(0x432818));

    // Age spots: 2x2 blends of a brown tone at up to 30% opacity
    let spot = hex(0x8b7355);
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
    for _ in 0..50 {
        let x = rng.gen_range(0..width) as i64;
        let y = rng.gen_range(0..height) as i64;
        let opacity = rng.r#gen::<f64>() * 0.3;
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let (px, py) = (x + dx, y + dy);
            if let Some(under) = buf.get_pixel(px as u32, py as u32) {
                buf.put_pixel_clipped(px, py, lerp(under, spot, opacity));
            }
        }
    }
    Ok(buf.into())
}
