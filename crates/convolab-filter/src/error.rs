//! Error types for convolab-filter

use thiserror::Error;

/// Errors that can occur while building kernels or filtering images
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] convolab_core::Error),

    /// Requested kernel name is not registered in the catalog
    #[error("unknown kernel: '{0}'")]
    UnknownKernel(String),

    /// Strength must be a non-negative number
    #[error("invalid strength: {0} (must be >= 0)")]
    InvalidStrength(f64),

    /// Kernel divisor is zero or not finite
    #[error("kernel '{kernel}' has a zero or non-finite divisor")]
    ZeroDivisor {
        /// Name of the rejected kernel
        kernel: String,
    },

    /// Malformed kernel matrix
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// A kernel with this name is already registered
    #[error("duplicate kernel name: '{0}'")]
    DuplicateKernel(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
