use derive_builder::Builder;

/// Process-wide toggles consumed by the scanner and the pipeline.
///
/// The configuration is read-only once built; thread it into
/// [`crate::pipeline::run`] or [`crate::scanner::count_stats`] by value.
#[derive(Debug, Clone, Copy, Default, Builder)]
#[builder(setter(into), default)]
pub struct ScanConfig {
    /// Treat NUL bytes as data instead of a binary-file sentinel.
    pub disable_check_binary: bool,

    /// Digest file contents and drop repeated `(size, digest)` pairs.
    pub duplicates: bool,

    /// Skips complexity-token counting when set.
    pub complexity: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(!config.disable_check_binary);
        assert!(!config.duplicates);
        assert!(!config.complexity);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ScanConfigBuilder::default()
            .duplicates(true)
            .complexity(true)
            .build()
            .unwrap();
        assert!(config.duplicates);
        assert!(config.complexity);
        assert!(!config.disable_check_binary);
    }
}
