//! Filter session regression test
//!
//! Drives a session the way an interactive front end would and checks that
//! the background variant ends up with the same pixels.

use convolab_io::{FileSource, load_or_placeholder, patterns};
use convolab_session::{BackgroundSession, FilterSession, MAX_UI_STRENGTH, SessionError};
use convolab_test::{RegParams, test_pattern};
use std::time::Duration;

#[test]
fn session_reg() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rp = RegParams::new("session");

    // --- Test 1: Missing photo falls back to the placeholder ---
    let photo = load_or_placeholder(&FileSource::new("does/not/exist/hilbert.jpg"));
    let expected = patterns::placeholder(400, 300).expect("placeholder");
    rp.compare_pix(&expected, &photo);

    // --- Test 2: Walk the catalog and the strength range ---
    let mut session = FilterSession::new();
    session.load(photo.clone()).expect("load");
    rp.compare_pix(&photo, session.output().expect("output"));

    let names: Vec<String> = session.catalog().names().map(str::to_string).collect();
    for name in &names {
        session.set_kernel(name).expect("set_kernel");
        for step in 0..=6 {
            let strength = MAX_UI_STRENGTH * step as f64 / 6.0;
            session.set_strength(strength).expect("set_strength");
            let out = session.output().expect("output");
            rp.compare_values(photo.width() as f64, out.width() as f64, 0.0);
        }
    }

    // --- Test 3: Rejected requests keep state ---
    session.set_kernel("emboss").expect("emboss");
    session.set_strength(1.0).expect("strength");
    let before = session.output().cloned().expect("output");
    let unknown = session.set_kernel("doesNotExist");
    rp.compare_values(1.0, matches!(unknown, Err(SessionError::Filter(_))) as u8 as f64, 0.0);
    let negative = session.set_strength(-1.0);
    rp.compare_values(1.0, negative.is_err() as u8 as f64, 0.0);
    rp.compare_pix(&before, session.output().expect("output"));
    rp.compare_values(1.0, session.strength(), 0.0);
    let expected = convolab_filter::apply_named(&photo, "emboss", 1.0).expect("emboss");
    rp.compare_pix(&expected, &before);

    // --- Test 4: Reset then apply restores the filtered output ---
    session.reset();
    rp.compare_pix(&photo, session.output().expect("output"));
    session.apply().expect("apply");
    rp.compare_pix(&before, session.output().expect("output"));

    // --- Test 5: Background session converges to the same bytes ---
    let source = test_pattern("mandelbrot").expect("mandelbrot");
    let mut sync = FilterSession::new();
    let mut bg = BackgroundSession::new().expect("spawn worker");
    sync.load(source.clone()).expect("load");
    bg.load(source).expect("load");
    for (name, strength) in [("sobelX", 1.0), ("sobelY", 2.0), ("unsharpMask", 0.75)] {
        sync.set_kernel(name).expect("kernel");
        sync.set_strength(strength).expect("strength");
        bg.set_kernel(name).expect("kernel");
        bg.set_strength(strength).expect("strength");
    }
    let done = bg.wait_timeout(Duration::from_secs(30)).expect("wait");
    rp.compare_values(1.0, done as u8 as f64, 0.0);
    rp.compare_pix(sync.output().expect("sync"), bg.output().expect("bg"));

    assert!(rp.cleanup(), "session regression test failed");
}
