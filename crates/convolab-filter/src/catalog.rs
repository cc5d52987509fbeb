//! Kernel catalog
//!
//! An immutable, ordered registry of named kernels. The reference set is
//! built once per process by [`KernelCatalog::builtin`]; other catalogs are
//! assembled with [`CatalogBuilder`], which validates every entry before the
//! catalog becomes available.

use crate::{FilterError, FilterResult, Kernel};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Name of the kernel a fresh session starts with.
pub const IDENTITY: &str = "identity";

/// Enumeration entry returned by [`KernelCatalog::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelInfo<'a> {
    pub name: &'a str,
    pub display_name: &'a str,
    pub description: &'a str,
}

/// Read-only registry of kernels, in registration order
#[derive(Debug, Clone)]
pub struct KernelCatalog {
    kernels: Vec<Arc<Kernel>>,
    index: HashMap<String, usize>,
}

impl KernelCatalog {
    /// The process-wide reference catalog.
    pub fn builtin() -> &'static KernelCatalog {
        Self::builtin_shared_ref()
    }

    /// The reference catalog as a shared handle.
    ///
    /// Every call returns a clone of the same `Arc`.
    pub fn builtin_shared() -> Arc<KernelCatalog> {
        Arc::clone(Self::builtin_shared_ref())
    }

    fn builtin_shared_ref() -> &'static Arc<KernelCatalog> {
        static BUILTIN: OnceLock<Arc<KernelCatalog>> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let catalog = Self::from_table(BUILTIN_TABLE)
                .unwrap_or_else(|e| panic!("invalid builtin kernel table: {e}"));
            Arc::new(catalog)
        })
    }

    /// Build a catalog from a static definition table.
    ///
    /// Every entry goes through [`Kernel::from_rows`] and
    /// [`CatalogBuilder::register`].
    ///
    /// # Errors
    ///
    /// Returns the first construction or registration error.
    pub(crate) fn from_table(table: &[KernelDef]) -> FilterResult<KernelCatalog> {
        let mut builder = CatalogBuilder::new();
        for &(name, display_name, description, rows, divisor, centered) in table {
            let kernel =
                Kernel::from_rows(name, display_name, description, rows, divisor, centered)?;
            builder = builder.register(kernel)?;
        }
        Ok(builder.build())
    }

    /// Start an empty catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Look up a kernel by name.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownKernel`] if `name` is not registered.
    pub fn get(&self, name: &str) -> FilterResult<Arc<Kernel>> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.kernels[i]))
            .ok_or_else(|| FilterError::UnknownKernel(name.to_string()))
    }

    /// Whether a kernel with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// `(name, display name, description)` for every kernel, in order.
    pub fn list(&self) -> impl Iterator<Item = KernelInfo<'_>> {
        self.kernels.iter().map(|k| KernelInfo {
            name: k.name(),
            display_name: k.display_name(),
            description: k.description(),
        })
    }

    /// Registered names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kernels.iter().map(|k| k.name())
    }

    /// Iterate over the kernels themselves.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Kernel>> {
        self.kernels.iter()
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

/// Builder for [`KernelCatalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    kernels: Vec<Arc<Kernel>>,
    index: HashMap<String, usize>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a copy of the reference kernels.
    pub fn with_builtin() -> Self {
        let builtin = KernelCatalog::builtin();
        Self {
            kernels: builtin.kernels.clone(),
            index: builtin.index.clone(),
        }
    }

    /// Add a kernel.
    ///
    /// Kernels are validated by [`Kernel::new`], so only the name needs
    /// checking here.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DuplicateKernel`] if the name is taken.
    pub fn register(mut self, kernel: Kernel) -> FilterResult<Self> {
        if self.index.contains_key(kernel.name()) {
            return Err(FilterError::DuplicateKernel(kernel.name().to_string()));
        }
        self.index.insert(kernel.name().to_string(), self.kernels.len());
        self.kernels.push(Arc::new(kernel));
        Ok(self)
    }

    pub fn build(self) -> KernelCatalog {
        KernelCatalog {
            kernels: self.kernels,
            index: self.index,
        }
    }
}

/// Reference kernel table: `(name, display name, description, rows,
/// divisor, centered)`.
pub(crate) type KernelDef = (
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static [i32]],
    f64,
    bool,
);

const BUILTIN_TABLE: &[KernelDef] = &[
    (
        "identity",
        "Identity",
        "Returns the original image unchanged. Used as a baseline for testing.",
        &[&[0, 0, 0], &[0, 1, 0], &[0, 0, 0]],
        1.0,
        false,
    ),
    (
        "gaussianBlur",
        "Gaussian Blur",
        "Smooths the image by averaging neighboring pixels with a Gaussian weight \
         distribution. Reduces noise and creates a natural-looking blur effect.",
        &[&[1, 2, 1], &[2, 4, 2], &[1, 2, 1]],
        16.0,
        false,
    ),
    (
        "boxBlur",
        "Box Blur",
        "Simple blur effect that averages all surrounding pixels equally. Creates a \
         uniform blur but less sophisticated than Gaussian blur.",
        &[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]],
        9.0,
        false,
    ),
    (
        "sharpen",
        "Sharpen",
        "Enhances edges and details by emphasizing differences between neighboring \
         pixels. Makes the image appear crisper and more defined.",
        &[&[0, -1, 0], &[-1, 5, -1], &[0, -1, 0]],
        1.0,
        false,
    ),
    (
        "edgeDetection",
        "Edge Detection (Laplacian)",
        "Highlights edges and rapid intensity changes in the image. Useful for finding \
         boundaries and structural features.",
        &[&[0, -1, 0], &[-1, 4, -1], &[0, -1, 0]],
        1.0,
        true,
    ),
    (
        "emboss",
        "Emboss",
        "Creates a raised or carved appearance by emphasizing edges in one direction. \
         Gives the image a 3D sculptural effect.",
        &[&[-2, -1, 0], &[-1, 1, 1], &[0, 1, 2]],
        1.0,
        true,
    ),
    (
        "sobelX",
        "Sobel X (Vertical Edges)",
        "Detects vertical edges by calculating horizontal gradients. Part of the Sobel \
         edge detection algorithm.",
        &[&[-1, 0, 1], &[-2, 0, 2], &[-1, 0, 1]],
        1.0,
        true,
    ),
    (
        "sobelY",
        "Sobel Y (Horizontal Edges)",
        "Detects horizontal edges by calculating vertical gradients. Complements Sobel X \
         for complete edge detection.",
        &[&[-1, -2, -1], &[0, 0, 0], &[1, 2, 1]],
        1.0,
        true,
    ),
    (
        "motionBlur",
        "Motion Blur",
        "Creates a diagonal motion blur effect, simulating camera shake or object \
         movement during exposure.",
        &[
            &[1, 0, 0, 0, 0],
            &[0, 1, 0, 0, 0],
            &[0, 0, 1, 0, 0],
            &[0, 0, 0, 1, 0],
            &[0, 0, 0, 0, 1],
        ],
        5.0,
        false,
    ),
    (
        "unsharpMask",
        "Unsharp Mask",
        "Advanced sharpening technique that enhances details while preserving natural \
         appearance. Used in professional image editing.",
        &[&[0, -1, 0], &[-1, 5, -1], &[0, -1, 0]],
        1.0,
        false,
    ),
];
