//! Background convolution worker
//!
//! One thread per worker, fed over a `crossbeam` channel. Every job carries
//! a generation number; the owner publishes the newest generation through a
//! shared atomic. The worker only ever runs the newest job it has been
//! sent, and abandons a running job as soon as a newer generation appears.

use crate::{SessionError, SessionResult};
use convolab_core::PixelBuffer;
use convolab_filter::{FilterResult, Kernel, apply_cancellable, apply_parallel};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A convolution request
#[derive(Debug, Clone)]
pub struct FilterJob {
    pub generation: u64,
    pub source: PixelBuffer,
    pub kernel: Arc<Kernel>,
    pub strength: f64,
    pub parallel: bool,
}

/// The result of a job that ran to completion
#[derive(Debug)]
pub struct JobOutcome {
    pub generation: u64,
    pub output: FilterResult<PixelBuffer>,
}

/// Handle to a convolution thread
#[derive(Debug)]
pub struct FilterWorker {
    jobs: Option<Sender<FilterJob>>,
    results: Receiver<JobOutcome>,
    latest: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl FilterWorker {
    /// Start the worker thread.
    pub fn spawn() -> SessionResult<Self> {
        let (job_tx, job_rx) = channel::unbounded();
        let (result_tx, result_rx) = channel::unbounded();
        let latest = Arc::new(AtomicU64::new(0));

        let shared = Arc::clone(&latest);
        let handle = thread::Builder::new()
            .name("convolab-worker".to_string())
            .spawn(move || run(job_rx, result_tx, shared))?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            latest,
            handle: Some(handle),
        })
    }

    /// Newest generation published.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Publish `generation` as the newest, cancelling anything older.
    pub fn supersede(&self, generation: u64) {
        self.latest.store(generation, Ordering::Release);
    }

    /// Publish the job's generation and queue it.
    pub fn submit(&self, job: FilterJob) -> SessionResult<()> {
        let jobs = self.jobs.as_ref().ok_or(SessionError::WorkerDisconnected)?;
        self.supersede(job.generation);
        jobs.send(job).map_err(|_| SessionError::WorkerDisconnected)
    }

    /// Take a finished outcome without blocking.
    pub fn try_recv(&self) -> SessionResult<Option<JobOutcome>> {
        match self.results.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SessionError::WorkerDisconnected),
        }
    }

    /// Block until an outcome arrives.
    pub fn recv(&self) -> SessionResult<JobOutcome> {
        self.results
            .recv()
            .map_err(|_| SessionError::WorkerDisconnected)
    }

    /// Block until an outcome arrives or `timeout` elapses.
    pub fn recv_timeout(&self, timeout: Duration) -> SessionResult<Option<JobOutcome>> {
        match self.results.recv_timeout(timeout) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SessionError::WorkerDisconnected),
        }
    }
}

impl Drop for FilterWorker {
    fn drop(&mut self) {
        // Abort the running job, then let the thread see the closed channel
        self.latest.fetch_add(1, Ordering::AcqRel);
        self.jobs.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("filter worker panicked");
        }
    }
}

fn run(jobs: Receiver<FilterJob>, results: Sender<JobOutcome>, latest: Arc<AtomicU64>) {
    while let Ok(mut job) = jobs.recv() {
        // Coalesce: only the newest queued job matters
        while let Ok(newer) = jobs.try_recv() {
            log::trace!("dropping queued job {}", job.generation);
            job = newer;
        }

        let generation = job.generation;
        if latest.load(Ordering::Acquire) != generation {
            log::trace!("skipping stale job {}", generation);
            continue;
        }

        let is_cancelled = || latest.load(Ordering::Acquire) != generation;
        let output = if job.parallel {
            apply_parallel(&job.source, &job.kernel, job.strength).map(Some)
        } else {
            apply_cancellable(&job.source, &job.kernel, job.strength, is_cancelled)
        };

        let output = match output {
            Ok(Some(pix)) => Ok(pix),
            Ok(None) => {
                log::trace!("job {} cancelled", generation);
                continue;
            }
            Err(e) => Err(e),
        };

        log::debug!("job {} finished", generation);
        if results.send(JobOutcome { generation, output }).is_err() {
            break;
        }
    }
    log::trace!("filter worker exiting");
}
