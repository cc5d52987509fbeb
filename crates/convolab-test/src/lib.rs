//! convolab-test - Regression test framework for convolab
//!
//! Regression tests run in one of three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! In compare mode a missing golden file counts as a failure; run once with
//! `REGTEST_MODE=generate` to create it.
//!
//! # Usage
//!
//! ```ignore
//! use convolab_test::{RegParams, RegTestMode};
//!
//! let mut rp = RegParams::new("convolve");
//! rp.compare_values(128.0, pixel.r as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use convolab_core::PixelBuffer;
use convolab_io::Pattern;

/// Render a built-in pattern at its default size
///
/// # Arguments
///
/// * `name` - Pattern name (e.g., "checkerboard")
pub fn test_pattern(name: &str) -> TestResult<PixelBuffer> {
    let pattern: Pattern = name.parse().map_err(|e: convolab_io::IoError| TestError::ImageLoad {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    convolab_io::ImageSource::load(&pattern).map_err(|e| TestError::ImageLoad {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // convolab-test is at crates/convolab-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
