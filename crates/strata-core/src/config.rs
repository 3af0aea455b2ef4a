//! Configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [store]
//! data_dir = "./data"
//! file_prefix = "strategic-planning."
//!
//! [cache]
//! enabled = true
//! max_capacity = 10000
//! ttl_secs = 300
//! ```
//!
//! Every key is optional and falls back to [`StrataConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid value
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    /// Entity store settings
    pub store: StoreConfig,
    /// Goal completion cache settings
    pub cache: CacheConfig,
}

impl StrataConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Malformed TOML or an invalid value
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Unreadable file, malformed TOML or an invalid value
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store.data_dir = dir.into();
        self
    }

    /// With goal cache enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    /// Check value constraints
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_capacity must be positive when the cache is enabled".to_string(),
            ));
        }
        if self.cache.ttl_secs == Some(0) {
            return Err(ConfigError::Invalid("cache.ttl_secs must be positive".to_string()));
        }
        if self.store.file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "store.file_prefix must not contain a path separator: {:?}",
                self.store.file_prefix
            )));
        }
        Ok(())
    }
}

/// Entity store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON file per collection
    pub data_dir: PathBuf,
    /// File name prefix for every collection
    pub file_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_prefix: strata_store::DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Goal completion cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether goal completions are cached between reads
    pub enabled: bool,
    /// Maximum cached goals
    pub max_capacity: u64,
    /// Optional time-to-live in seconds
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    /// Time-to-live as a duration
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 10_000,
            ttl_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(StrataConfig::from_toml_str("").unwrap(), StrataConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = StrataConfig::from_toml_str(
            r#"
            [store]
            data_dir = "/var/lib/strata"

            [cache]
            ttl_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.store.data_dir, PathBuf::from("/var/lib/strata"));
        assert_eq!(config.store.file_prefix, strata_store::DEFAULT_PREFIX);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn zero_capacity_rejected_when_enabled() {
        let err = StrataConfig::from_toml_str("[cache]\nmax_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let ok = StrataConfig::from_toml_str("[cache]\nenabled = false\nmax_capacity = 0");
        assert!(ok.is_ok());
    }

    #[test]
    fn prefix_with_separator_rejected() {
        let err = StrataConfig::from_toml_str("[store]\nfile_prefix = \"a/b\"").unwrap_err();
        assert!(err.to_string().contains("file_prefix"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            StrataConfig::from_toml_str("[cache\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn builder_methods() {
        let config = StrataConfig::new()
            .with_data_dir("/tmp/x")
            .with_cache_enabled(false);
        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/x"));
        assert!(!config.cache.enabled);
    }
}
