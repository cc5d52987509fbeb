//! Session error types

use convolab_filter::FilterError;
use thiserror::Error;

/// Errors reported by [`FilterSession`](crate::FilterSession) and
/// [`BackgroundSession`](crate::BackgroundSession).
#[derive(Error, Debug)]
pub enum SessionError {
    /// A kernel lookup, strength check or convolution failed
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The background worker thread could not be started
    #[error("failed to spawn filter worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The background worker thread is gone
    #[error("filter worker disconnected")]
    WorkerDisconnected,
}

/// Convenience alias for session results.
pub type SessionResult<T> = Result<T, SessionError>;
