//! convolab-filter - Kernels and convolution
//!
//! This crate provides:
//!
//! - [`Kernel`] - validated square convolution kernels
//! - [`KernelCatalog`] - the immutable registry of named kernels
//! - [`convolve`] - the convolution engine (sequential, parallel and
//!   cancellable entry points)

pub mod catalog;
pub mod convolve;
mod error;
pub mod kernel;

pub use catalog::{CatalogBuilder, IDENTITY, KernelCatalog, KernelInfo};
pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use convolve::{
    CENTER_OFFSET, apply, apply_cancellable, apply_named, apply_parallel, convolve_pixel,
    validate_strength, weighted_sums,
};
