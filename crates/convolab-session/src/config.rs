//! Session configuration

use convolab_filter::IDENTITY;

/// Kernel a new session starts with
pub const DEFAULT_KERNEL: &str = IDENTITY;
/// Strength a new session starts with
pub const DEFAULT_STRENGTH: f64 = 1.0;
/// Upper end of the strength range offered to users.
///
/// Not enforced; any non-negative strength is accepted.
pub const MAX_UI_STRENGTH: f64 = 3.0;

/// Initial parameters of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Catalog name of the active kernel
    pub kernel: String,
    /// Multiplier applied after the divisor
    pub strength: f64,
    /// Convolve rows in parallel
    pub parallel: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            kernel: DEFAULT_KERNEL.to_string(),
            strength: DEFAULT_STRENGTH,
            parallel: false,
        }
    }
}

impl SessionConfig {
    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = kernel.into();
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.kernel, "identity");
        assert_eq!(config.strength, 1.0);
        assert!(!config.parallel);
    }

    #[test]
    fn test_builder_methods() {
        let config = SessionConfig::default()
            .with_kernel("emboss")
            .with_strength(2.5)
            .with_parallel(true);
        assert_eq!(config.kernel, "emboss");
        assert_eq!(config.strength, 2.5);
        assert!(config.parallel);
    }
}
