//! convolab-session - Interactive filter sessions
//!
//! A [`FilterSession`] holds a source image, the active kernel and strength,
//! and the filtered output, recomputing synchronously whenever a parameter
//! changes. A [`BackgroundSession`] offers the same operations but hands
//! recomputation to a worker thread that drops superseded requests.

mod background;
mod config;
mod error;
mod session;
mod worker;

pub use background::BackgroundSession;
pub use config::{DEFAULT_KERNEL, DEFAULT_STRENGTH, MAX_UI_STRENGTH, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use session::FilterSession;
pub use worker::{FilterJob, FilterWorker, JobOutcome};
