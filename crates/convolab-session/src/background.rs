//! Filter session with off-thread recomputation
//!
//! Parameter changes return immediately; the filtered image arrives later
//! through [`BackgroundSession::poll`] or [`BackgroundSession::wait`]. Only
//! the result for the most recent request is ever installed.

use crate::worker::{FilterJob, FilterWorker, JobOutcome};
use crate::{SessionConfig, SessionResult};
use convolab_core::PixelBuffer;
use convolab_filter::{Kernel, KernelCatalog, validate_strength};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Asynchronous counterpart of [`FilterSession`](crate::FilterSession)
#[derive(Debug)]
pub struct BackgroundSession {
    catalog: Arc<KernelCatalog>,
    kernel: Arc<Kernel>,
    strength: f64,
    parallel: bool,
    source: Option<PixelBuffer>,
    output: Option<PixelBuffer>,
    /// Newest generation issued
    generation: u64,
    /// Generation whose filtered result is in `output`
    installed: Option<u64>,
    /// A job for `generation` is outstanding
    pending: bool,
    worker: FilterWorker,
}

impl BackgroundSession {
    /// Create a session over the builtin catalog with default parameters.
    pub fn new() -> SessionResult<Self> {
        Self::with_config(KernelCatalog::builtin_shared(), SessionConfig::default())
    }

    /// Create a session over `catalog` with the given initial parameters.
    pub fn with_config(catalog: Arc<KernelCatalog>, config: SessionConfig) -> SessionResult<Self> {
        let kernel = catalog.get(&config.kernel)?;
        let strength = validate_strength(config.strength)?;
        let worker = FilterWorker::spawn()?;
        Ok(Self {
            catalog,
            kernel,
            strength,
            parallel: config.parallel,
            source: None,
            output: None,
            generation: 0,
            installed: None,
            pending: false,
            worker,
        })
    }

    /// Replace the source image and schedule recomputation.
    pub fn load(&mut self, source: PixelBuffer) -> SessionResult<()> {
        log::debug!("loading {}x{} source", source.width(), source.height());
        self.source = Some(source);
        self.schedule()
    }

    /// Switch to the catalog kernel `name` and schedule recomputation.
    pub fn set_kernel(&mut self, name: &str) -> SessionResult<()> {
        let kernel = self.catalog.get(name)?;
        log::debug!("kernel: {} -> {}", self.kernel.name(), kernel.name());
        self.kernel = kernel;
        self.schedule()
    }

    /// Set the strength multiplier and schedule recomputation.
    pub fn set_strength(&mut self, strength: f64) -> SessionResult<()> {
        let strength = validate_strength(strength)?;
        log::debug!("strength: {} -> {}", self.strength, strength);
        self.strength = strength;
        self.schedule()
    }

    /// Choose between sequential and row-parallel convolution for later jobs.
    ///
    /// Parallel jobs cannot be interrupted once started.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Cancel outstanding work and show the source unchanged.
    pub fn reset(&mut self) {
        let Some(source) = &self.source else {
            return;
        };
        log::debug!("reset to source");
        self.generation += 1;
        self.worker.supersede(self.generation);
        self.output = Some(source.clone());
        self.installed = None;
        self.pending = false;
    }

    /// Schedule recomputation unless the output is current or a job for the
    /// current parameters is already outstanding.
    pub fn apply(&mut self) -> SessionResult<()> {
        if self.pending || self.is_current() {
            return Ok(());
        }
        self.schedule()
    }

    fn schedule(&mut self) -> SessionResult<()> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        self.generation += 1;
        let job = FilterJob {
            generation: self.generation,
            source: source.clone(),
            kernel: Arc::clone(&self.kernel),
            strength: self.strength,
            parallel: self.parallel,
        };
        log::debug!(
            "scheduling job {}: {} at strength {}",
            job.generation,
            job.kernel.name(),
            job.strength
        );
        self.pending = true;
        self.worker.submit(job)
    }

    /// Install the outcome if it answers the newest request.
    ///
    /// Returns `true` if `output` changed.
    fn install(&mut self, outcome: JobOutcome) -> SessionResult<bool> {
        if outcome.generation != self.generation || !self.pending {
            log::trace!(
                "dropping stale result {} (latest {})",
                outcome.generation,
                self.generation
            );
            return Ok(false);
        }
        self.pending = false;
        let pix = outcome.output?;
        self.output = Some(pix);
        self.installed = Some(outcome.generation);
        Ok(true)
    }

    /// Install any finished result without blocking.
    ///
    /// Returns `true` if `output` was updated.
    pub fn poll(&mut self) -> SessionResult<bool> {
        let mut updated = false;
        loop {
            match self.worker.try_recv() {
                Ok(Some(outcome)) => updated |= self.install(outcome)?,
                Ok(None) => return Ok(updated),
                Err(e) if self.pending => return Err(e),
                Err(_) => return Ok(updated),
            }
        }
    }

    /// Block until the result for the newest request is installed.
    pub fn wait(&mut self) -> SessionResult<()> {
        while self.pending {
            let outcome = self.worker.recv()?;
            self.install(outcome)?;
        }
        Ok(())
    }

    /// Like [`wait`](Self::wait), giving up after `timeout`.
    ///
    /// Returns `false` if the result was still outstanding at the deadline.
    pub fn wait_timeout(&mut self, timeout: Duration) -> SessionResult<bool> {
        let deadline = Instant::now() + timeout;
        while self.pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.worker.recv_timeout(remaining)? {
                Some(outcome) => {
                    self.install(outcome)?;
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Whether `output` holds the filtered source for the current parameters.
    pub fn is_current(&self) -> bool {
        self.source.is_none() || (!self.pending && self.installed == Some(self.generation))
    }

    /// Whether a recomputation is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn source(&self) -> Option<&PixelBuffer> {
        self.source.as_ref()
    }

    /// The most recently installed output.
    ///
    /// May lag behind the parameters while [`is_pending`](Self::is_pending).
    pub fn output(&self) -> Option<&PixelBuffer> {
        self.output.as_ref()
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn catalog(&self) -> &KernelCatalog {
        &self.catalog
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Newest generation issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
