//! Configuration for the Kurama core subsystems.
//!
//! Maps directly to `kurama.toml`. Every field has a default, so an empty
//! document yields the stock limits.

use serde::{Deserialize, Serialize};

use crate::error::{KuramaError, Result};
use crate::processor::DEFAULT_PROCESSORS;

/// Top-level Kurama configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KuramaConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Record store limits.
    #[serde(default)]
    pub store: StoreConfig,
    /// Processor registry limits.
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl KuramaConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `KuramaError::Config` if the TOML is invalid or a limit is
    /// unusable.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| KuramaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject limits the subsystems cannot work with.
    ///
    /// # Errors
    /// Returns `KuramaError::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.store.initial_capacity == 0 {
            return Err(KuramaError::Config(
                "store.initial_capacity must be at least 1".to_string(),
            ));
        }
        if self.registry.max_processors == 0 {
            return Err(KuramaError::Config(
                "registry.max_processors must be at least 1".to_string(),
            ));
        }
        if self.registry.load_defaults && self.registry.max_processors < DEFAULT_PROCESSORS.len() {
            return Err(KuramaError::Config(format!(
                "registry.max_processors must be at least {} when load_defaults is set",
                DEFAULT_PROCESSORS.len()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level for the embedding application: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Record store sizing and text bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Slots allocated when the store is created.
    #[serde(default = "default_10")]
    pub initial_capacity: usize,
    /// Maximum stored text length in bytes; longer text is cut silently.
    #[serde(default = "default_511")]
    pub max_text_len: usize,
    /// Maximum stored tag length in bytes; longer tags are cut silently.
    #[serde(default = "default_63")]
    pub max_tag_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 10,
            max_text_len: 511,
            max_tag_len: 63,
        }
    }
}

/// Processor registry bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Hard cap on registered processors.
    #[serde(default = "default_10")]
    pub max_processors: usize,
    /// Maximum processor name length in bytes.
    #[serde(default = "default_63")]
    pub max_name_len: usize,
    /// Maximum processor description length in bytes.
    #[serde(default = "default_255")]
    pub max_description_len: usize,
    /// Register and activate the stock processors on construction.
    #[serde(default = "default_true")]
    pub load_defaults: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_processors: 10,
            max_name_len: 63,
            max_description_len: 255,
            load_defaults: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_10() -> usize { 10 }
fn default_63() -> usize { 63 }
fn default_255() -> usize { 255 }
fn default_511() -> usize { 511 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = KuramaConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.store.initial_capacity, 10);
        assert_eq!(config.store.max_text_len, 511);
        assert_eq!(config.store.max_tag_len, 63);
        assert_eq!(config.registry.max_processors, 10);
        assert!(config.registry.load_defaults);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = KuramaConfig::from_toml(
            "[store]\ninitial_capacity = 4\n\n[registry]\nload_defaults = false\n",
        )
        .expect("partial config parses");
        assert_eq!(config.store.initial_capacity, 4);
        assert_eq!(config.store.max_tag_len, 63);
        assert!(!config.registry.load_defaults);
        assert_eq!(config.registry.max_processors, 10);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = KuramaConfig::from_toml("[store]\ninitial_capacity = 0\n");
        assert!(matches!(err, Err(KuramaError::Config(_))));
        let err = KuramaConfig::from_toml("[registry]\nmax_processors = 0\n");
        assert!(matches!(err, Err(KuramaError::Config(_))));
    }

    #[test]
    fn registry_too_small_for_defaults_is_rejected() {
        let err = KuramaConfig::from_toml("[registry]\nmax_processors = 3\n");
        assert!(matches!(err, Err(KuramaError::Config(_))));

        let config =
            KuramaConfig::from_toml("[registry]\nmax_processors = 3\nload_defaults = false\n")
                .expect("no stock set to fit");
        assert_eq!(config.registry.max_processors, 3);

        let config = KuramaConfig::from_toml("[registry]\nmax_processors = 4\n")
            .expect("stock set fits exactly");
        assert_eq!(config.registry.max_processors, 4);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = KuramaConfig::from_toml("[store\n");
        assert!(matches!(err, Err(KuramaError::Config(_))));
    }
}
