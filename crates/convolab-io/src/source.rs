//! Image sources
//!
//! An [`ImageSource`] produces a [`PixelBuffer`] on demand. Sources are
//! either files on disk, encoded bytes in memory, or a synthetic
//! [`Pattern`].

use crate::patterns::{self, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::{IoError, IoResult, read_image, read_image_mem};
use convolab_core::PixelBuffer;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Something that can produce an image.
pub trait ImageSource {
    /// Produce the image.
    fn load(&self) -> IoResult<PixelBuffer>;

    /// Short label used in log messages.
    fn describe(&self) -> String;
}

/// An image file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileSource {
    fn load(&self) -> IoResult<PixelBuffer> {
        read_image(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An encoded image held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl ImageSource for MemorySource {
    fn load(&self) -> IoResult<PixelBuffer> {
        read_image_mem(&self.data)
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.data.len())
    }
}

/// Built-in synthetic images, rendered at the default 400x300 size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Square, disc and pentagon over a gradient
    Geometric,
    /// Linear and radial color ramps
    Gradient,
    /// 25-pixel black and white squares
    Checkerboard,
    /// Seeded gray noise
    Noise,
    /// Mandelbrot escape-time shading
    Mandelbrot,
    /// Concentric rings and two filled discs
    Circles,
    /// Sepia stand-in for a photograph
    Placeholder,
}

impl Pattern {
    /// All patterns, in presentation order.
    pub const ALL: [Pattern; 7] = [
        Pattern::Geometric,
        Pattern::Gradient,
        Pattern::Checkerboard,
        Pattern::Noise,
        Pattern::Mandelbrot,
        Pattern::Circles,
        Pattern::Placeholder,
    ];

    /// Lookup name of the pattern.
    pub fn name(self) -> &'static str {
        match self {
            Pattern::Geometric => "geometric",
            Pattern::Gradient => "gradient",
            Pattern::Checkerboard => "checkerboard",
            Pattern::Noise => "noise",
            Pattern::Mandelbrot => "mandelbrot",
            Pattern::Circles => "circles",
            Pattern::Placeholder => "placeholder",
        }
    }

    /// Find a pattern by its lookup name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Render the pattern at the given size.
    pub fn render(self, width: u32, height: u32) -> IoResult<PixelBuffer> {
        let pix = match self {
            Pattern::Geometric => patterns::geometric_shapes(width, height),
            Pattern::Gradient => patterns::color_gradients(width, height),
            Pattern::Checkerboard => {
                patterns::checkerboard(width, height, patterns::DEFAULT_SQUARE)
            }
            Pattern::Noise => patterns::noise(width, height, patterns::DEFAULT_SEED),
            Pattern::Mandelbrot => {
                patterns::mandelbrot(width, height, patterns::DEFAULT_MAX_ITERATIONS)
            }
            Pattern::Circles => patterns::concentric_circles(width, height),
            Pattern::Placeholder => patterns::placeholder(width, height),
        }?;
        Ok(pix)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
            IoError::UnknownPattern {
                name: s.to_string(),
                expected: names.join(", "),
            }
        })
    }
}

impl ImageSource for Pattern {
    fn load(&self) -> IoResult<PixelBuffer> {
        self.render(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    fn describe(&self) -> String {
        format!("pattern '{}'", self.name())
    }
}

/// Load an image, substituting the sepia placeholder if loading fails.
///
/// The failure is logged at warn level and never propagated.
pub fn load_or_placeholder(source: &dyn ImageSource) -> PixelBuffer {
    match source.load() {
        Ok(pix) => pix,
        Err(e) => {
            log::warn!(
                "failed to load {}: {}; using placeholder image",
                source.describe(),
                e
            );
            // Default dimensions are non-zero, so rendering cannot fail
            patterns::placeholder(DEFAULT_WIDTH, DEFAULT_HEIGHT)
                .expect("default placeholder dimensions are valid")
        }
    }
}
