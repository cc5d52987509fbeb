//! Convolution regression test
//!
//! Runs every builtin kernel over the synthetic patterns and checks the
//! engine's pixel-level guarantees.

use convolab_core::{PixelBuffer, Rgba};
use convolab_filter::{KernelCatalog, apply, apply_named, apply_parallel, weighted_sums};
use convolab_test::{RegParams, test_pattern};

#[test]
fn convolve_reg() {
    let mut rp = RegParams::new("convolve");
    let catalog = KernelCatalog::builtin();

    let pixs = test_pattern("geometric").expect("render geometric");
    let w = pixs.width();
    let h = pixs.height();
    eprintln!("Image size: {}x{}", w, h);

    // --- Test 1: Identity reproduces the source ---
    let ident = apply_named(&pixs, "identity", 1.0).expect("identity");
    rp.compare_pix(&pixs, &ident);

    // --- Test 2: Every kernel keeps size and alpha, and is deterministic ---
    for kernel in catalog.iter() {
        let out = apply(&pixs, kernel, 1.0).expect("apply");
        rp.compare_values(w as f64, out.width() as f64, 0.0);
        rp.compare_values(h as f64, out.height() as f64, 0.0);
        rp.compare_values(1.0, alpha_matches(&pixs, &out) as u8 as f64, 0.0);

        let again = apply(&pixs, kernel, 1.0).expect("apply again");
        rp.compare_strings(out.as_bytes(), again.as_bytes());

        let par = apply_parallel(&pixs, kernel, 1.0).expect("apply_parallel");
        rp.compare_pix(&out, &par);
        eprintln!("  {}: ok", kernel.name());
    }

    // --- Test 3: Border replication at the corner ---
    let noise = test_pattern("noise").expect("render noise");
    let blur = catalog.get("boxBlur").expect("boxBlur");
    let out = apply(&noise, &blur, 1.0).expect("box blur");
    let mut sum = [0i64; 3];
    for (dx, dy) in [(0, 0), (0, 0), (1, 0), (0, 0), (0, 0), (1, 0), (0, 1), (0, 1), (1, 1)] {
        let p = noise.get_pixel_unchecked(dx, dy);
        sum[0] += p.r as i64;
        sum[1] += p.g as i64;
        sum[2] += p.b as i64;
    }
    rp.compare_values(
        sum[0] as f64,
        weighted_sums(&noise, &blur, 0, 0)[0] as f64,
        0.0,
    );
    let expected = ((sum[0] as f64 / 9.0).clamp(0.0, 255.0)).round_ties_even();
    rp.compare_values(expected, out.get_pixel_unchecked(0, 0).r as f64, 0.0);

    // --- Test 4: Strength scaling ---
    let flat = PixelBuffer::filled(9, 9, Rgba::rgb(40, 60, 80)).expect("flat");
    let sharpen = catalog.get("sharpen").expect("sharpen");
    for &(strength, expected) in &[(0.0, 0.0), (0.5, 20.0), (1.0, 40.0), (2.0, 80.0), (8.0, 255.0)] {
        let out = apply(&flat, &sharpen, strength).expect("sharpen");
        rp.compare_values(expected, out.get_pixel_unchecked(4, 4).r as f64, 0.0);
    }

    // --- Test 5: Centered kernels sit on mid-gray for flat input ---
    for name in ["edgeDetection", "sobelX", "sobelY"] {
        let out = apply_named(&flat, name, 1.0).expect("centered");
        let all_mid = out
            .as_bytes()
            .chunks_exact(4)
            .all(|p| p[0] == 128 && p[1] == 128 && p[2] == 128);
        rp.compare_values(1.0, all_mid as u8 as f64, 0.0);
        let zero = apply_named(&flat, name, 0.0).expect("centered zero");
        rp.compare_values(128.0, zero.get_pixel_unchecked(0, 0).g as f64, 0.0);
    }

    // --- Test 6: Impulse responses against hand-computed outputs ---
    let pulse = impulse(3, 160);
    let out = apply_named(&pulse, "gaussianBlur", 1.0).expect("gaussianBlur");
    rp.compare_pix(&gray_grid(3, &[10, 20, 10, 20, 40, 20, 10, 20, 10]), &out);

    let pulse = impulse(3, 40);
    let out = apply_named(&pulse, "emboss", 1.0).expect("emboss");
    rp.compare_pix(&gray_grid(3, &[208, 168, 128, 168, 168, 88, 128, 88, 48]), &out);

    // One tap of the diagonal lands on the center for x == y
    let pulse = impulse(5, 100);
    let out = apply_named(&pulse, "motionBlur", 1.0).expect("motionBlur");
    let diagonal: Vec<u8> = (0..25).map(|i| if i % 6 == 0 { 20 } else { 0 }).collect();
    rp.compare_pix(&gray_grid(5, &diagonal), &out);

    assert!(rp.cleanup(), "convolve regression test failed");
}

/// Black `size x size` image with one gray pixel of value `v` at the center.
fn impulse(size: u32, v: u8) -> PixelBuffer {
    let c = size / 2;
    PixelBuffer::from_fn(size, size, |x, y| {
        Rgba::gray(if (x, y) == (c, c) { v } else { 0 })
    })
    .expect("impulse")
}

/// Opaque gray image from row-major values.
fn gray_grid(size: u32, values: &[u8]) -> PixelBuffer {
    PixelBuffer::from_fn(size, size, |x, y| Rgba::gray(values[(y * size + x) as usize]))
        .expect("grid")
}

fn alpha_matches(a: &PixelBuffer, b: &PixelBuffer) -> bool {
    a.as_bytes()
        .chunks_exact(4)
        .zip(b.as_bytes().chunks_exact(4))
        .all(|(p, q)| p[3] == q[3])
}
