//! Synchronous filter session

use crate::{SessionConfig, SessionResult};
use convolab_core::PixelBuffer;
use convolab_filter::{FilterResult, Kernel, KernelCatalog, apply, apply_parallel, validate_strength};
use std::sync::Arc;

/// Source image, filter parameters and the derived output.
///
/// `output` always reflects either the filtered source for some accepted
/// parameter set, or an unfiltered copy of the source after [`reset`].
/// Rejected requests leave every field untouched.
///
/// [`reset`]: FilterSession::reset
#[derive(Debug, Clone)]
pub struct FilterSession {
    catalog: Arc<KernelCatalog>,
    kernel: Arc<Kernel>,
    strength: f64,
    parallel: bool,
    source: Option<PixelBuffer>,
    output: Option<PixelBuffer>,
    /// Bumped on every accepted change to source or parameters
    revision: u64,
    /// Revision that `output` was filtered at; `None` after a reset
    computed: Option<u64>,
}

impl Default for FilterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSession {
    /// Create a session over the builtin catalog with default parameters.
    pub fn new() -> Self {
        let catalog = KernelCatalog::builtin_shared();
        let kernel = catalog
            .get(crate::DEFAULT_KERNEL)
            .expect("builtin catalog contains the identity kernel");
        Self::from_parts(catalog, kernel, crate::DEFAULT_STRENGTH, false)
    }

    /// Create a session over `catalog` with the given initial parameters.
    ///
    /// # Errors
    ///
    /// Fails if `config.kernel` is not in `catalog` or `config.strength` is
    /// negative.
    pub fn with_config(catalog: Arc<KernelCatalog>, config: SessionConfig) -> SessionResult<Self> {
        let kernel = catalog.get(&config.kernel)?;
        let strength = validate_strength(config.strength)?;
        Ok(Self::from_parts(catalog, kernel, strength, config.parallel))
    }

    fn from_parts(
        catalog: Arc<KernelCatalog>,
        kernel: Arc<Kernel>,
        strength: f64,
        parallel: bool,
    ) -> Self {
        Self {
            catalog,
            kernel,
            strength,
            parallel,
            source: None,
            output: None,
            revision: 0,
            computed: None,
        }
    }

    /// Replace the source image and recompute.
    pub fn load(&mut self, source: PixelBuffer) -> SessionResult<()> {
        log::debug!("loading {}x{} source", source.width(), source.height());
        self.source = Some(source);
        self.revision += 1;
        self.recompute()
    }

    /// Switch to the catalog kernel `name` and recompute.
    pub fn set_kernel(&mut self, name: &str) -> SessionResult<()> {
        let kernel = self.catalog.get(name)?;
        log::debug!("kernel: {} -> {}", self.kernel.name(), kernel.name());
        self.kernel = kernel;
        self.revision += 1;
        self.recompute()
    }

    /// Set the strength multiplier and recompute.
    pub fn set_strength(&mut self, strength: f64) -> SessionResult<()> {
        let strength = validate_strength(strength)?;
        log::debug!("strength: {} -> {}", self.strength, strength);
        self.strength = strength;
        self.revision += 1;
        self.recompute()
    }

    /// Choose between sequential and row-parallel convolution.
    ///
    /// Both produce identical bytes, so the output is not invalidated.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Discard the filtered output and show the source unchanged.
    ///
    /// Kernel and strength are kept.
    pub fn reset(&mut self) {
        if let Some(source) = &self.source {
            log::debug!("reset to source");
            self.output = Some(source.clone());
            self.computed = None;
        }
    }

    /// Bring `output` up to date with the current parameters.
    ///
    /// Does nothing if the output already reflects them.
    pub fn apply(&mut self) -> SessionResult<()> {
        if self.is_current() {
            log::trace!("apply: output already at revision {}", self.revision);
            return Ok(());
        }
        self.recompute()
    }

    fn recompute(&mut self) -> SessionResult<()> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        log::debug!(
            "convolving {}x{} with {} at strength {}",
            source.width(),
            source.height(),
            self.kernel.name(),
            self.strength
        );
        let output = self.filter(source)?;
        self.output = Some(output);
        self.computed = Some(self.revision);
        Ok(())
    }

    fn filter(&self, source: &PixelBuffer) -> FilterResult<PixelBuffer> {
        if self.parallel {
            apply_parallel(source, &self.kernel, self.strength)
        } else {
            apply(source, &self.kernel, self.strength)
        }
    }

    /// Whether `output` holds the filtered source for the current parameters.
    pub fn is_current(&self) -> bool {
        self.source.is_none() || self.computed == Some(self.revision)
    }

    pub fn source(&self) -> Option<&PixelBuffer> {
        self.source.as_ref()
    }

    pub fn output(&self) -> Option<&PixelBuffer> {
        self.output.as_ref()
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn catalog(&self) -> &KernelCatalog {
        &self.catalog
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Count of accepted changes since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current parameters as a config.
    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            kernel: self.kernel.name().to_string(),
            strength: self.strength,
            parallel: self.parallel,
        }
    }
}
