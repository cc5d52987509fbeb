//! Convolab - 2D kernel convolution for RGBA images
//!
//! # Overview
//!
//! - A catalog of named 3x3 and 5x5 kernels (blurs, sharpening, edge
//!   detection, emboss)
//! - A convolution engine with clamp-to-border sampling, exact integer
//!   accumulation and alpha passthrough
//! - Filter sessions that keep a source, the active parameters and the
//!   filtered output in step, synchronously or on a worker thread
//! - PNG I/O and synthetic test patterns
//!
//! # Example
//!
//! ```
//! use convolab::{PixelBuffer, Rgba};
//! use convolab::session::FilterSession;
//!
//! let image = PixelBuffer::filled(8, 8, Rgba::rgb(90, 90, 90)).unwrap();
//! let mut session = FilterSession::new();
//! session.load(image).unwrap();
//! session.set_kernel("edgeDetection").unwrap();
//!
//! // Flat input has no edges: everything lands on mid-gray
//! let out = session.output().unwrap();
//! assert_eq!(out.get_pixel(3, 3), Some(Rgba::rgb(128, 128, 128)));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use convolab_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use convolab_filter as filter;
pub use convolab_io as io;
pub use convolab_session as session;
