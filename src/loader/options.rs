//! Loading options and configuration.

/// Options for loading a document.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// How integrity violations are handled
    pub mode: ValidationMode,
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set validation mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable lenient mode (report, repair, and skip invalid content).
    pub fn lenient(mut self) -> Self {
        self.mode = ValidationMode::Lenient;
        self
    }

    /// Check if lenient mode is enabled.
    pub fn is_lenient(&self) -> bool {
        self.mode == ValidationMode::Lenient
    }
}

/// Handling of integrity violations while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Fail on any violation
    #[default]
    Strict,
    /// Log each violation, then repair it or skip the offending block
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_options_builder() {
        let options = LoadOptions::new().lenient();
        assert_eq!(options.mode, ValidationMode::Lenient);
        assert!(options.is_lenient());
    }

    #[test]
    fn test_default_options() {
        let options = LoadOptions::default();
        assert_eq!(options.mode, ValidationMode::Strict);
        assert!(!options.is_lenient());
    }
}
