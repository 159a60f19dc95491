//! Pipeline configuration
//!
//! Loaded from TOML; every key is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! max_upload_bytes = 10485760
//! analysis_delay_ms = 2000
//! analysis_timeout_ms = 30000
//! result_cache_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use weedwise_intake::{IntakePolicy, DEFAULT_MAX_UPLOAD_BYTES};

/// Simulated analysis latency
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but make no sense together
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pipeline session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Largest accepted upload, inclusive
    pub max_upload_bytes: u64,

    /// Delay of the built-in mock analyzer
    pub analysis_delay_ms: u64,

    /// Upper bound on any backend call; `None` waits forever
    pub analysis_timeout_ms: Option<u64>,

    /// Results memoized per image; 0 disables caching
    pub result_cache_capacity: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            analysis_timeout_ms: None,
            result_cache_capacity: 0,
        }
    }
}

impl PipelineConfig {
    /// Create new config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set upload limit
    #[inline]
    #[must_use]
    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Set mock analysis delay
    #[inline]
    #[must_use]
    pub fn with_analysis_delay(mut self, delay: Duration) -> Self {
        self.analysis_delay_ms = duration_ms(delay);
        self
    }

    /// Set backend timeout
    #[inline]
    #[must_use]
    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout_ms = Some(duration_ms(timeout));
        self
    }

    /// Set result cache capacity
    #[inline]
    #[must_use]
    pub fn with_result_cache_capacity(mut self, capacity: u64) -> Self {
        self.result_cache_capacity = capacity;
        self
    }

    #[inline]
    #[must_use]
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    #[inline]
    #[must_use]
    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_ms.map(Duration::from_millis)
    }

    /// Intake rules derived from this config
    #[inline]
    #[must_use]
    pub fn intake_policy(&self) -> IntakePolicy {
        IntakePolicy::new(self.max_upload_bytes)
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// `Parse` for malformed TOML or unknown value types, `Invalid` if
    /// [`validate`](Self::validate) refuses the values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "loaded pipeline config");
        Ok(config)
    }

    /// Reject values no session could run with
    ///
    /// # Errors
    /// `Invalid` for a zero upload limit or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.analysis_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "analysis_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_intake_rules() {
        let config = PipelineConfig::new();
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.analysis_delay(), Duration::from_millis(2000));
        assert_eq!(config.analysis_timeout(), None);
        assert_eq!(config.intake_policy(), IntakePolicy::default());
    }

    #[test]
    fn builder_methods() {
        let config = PipelineConfig::new()
            .with_max_upload_bytes(1024)
            .with_analysis_delay(Duration::from_millis(10))
            .with_analysis_timeout(Duration::from_secs(1))
            .with_result_cache_capacity(8);

        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.analysis_delay_ms, 10);
        assert_eq!(config.analysis_timeout_ms, Some(1000));
        assert_eq!(config.result_cache_capacity, 8);
    }

    #[test]
    fn omitted_keys_fall_back_to_defaults() {
        let config = PipelineConfig::from_toml_str("analysis_timeout_ms = 500\n").unwrap();
        assert_eq!(
            config,
            PipelineConfig::new().with_analysis_timeout(Duration::from_millis(500))
        );

        let empty = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(empty, PipelineConfig::default());
    }

    #[test]
    fn toml_round_trip() {
        let config = PipelineConfig::new()
            .with_max_upload_bytes(4096)
            .with_analysis_timeout(Duration::from_secs(3))
            .with_result_cache_capacity(16);

        let rendered = toml::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn rejects_nonsense_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("max_upload_bytes = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("analysis_timeout_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("max_upload_bytes = \"big\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weedwise.toml");
        std::fs::write(&path, "analysis_delay_ms = 250\nresult_cache_capacity = 4\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.analysis_delay_ms, 250);
        assert_eq!(config.result_cache_capacity, 4);

        let missing = PipelineConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
