//! I/O error types
//!
//! Provides a unified error type for image loading and saving. Format
//! decoders map their library errors into `IoError` variants so callers
//! only need to handle one error type.

use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No test pattern has this name
    #[error("unknown pattern '{name}' (expected one of: {expected})")]
    UnknownPattern {
        /// The rejected name
        name: String,
        /// Comma-separated list of valid names
        expected: String,
    },

    /// A format decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. invalid dimensions)
    #[error("core error: {0}")]
    Core(#[from] convolab_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
