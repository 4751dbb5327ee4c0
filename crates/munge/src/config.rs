//! CLI configuration file support
//!
//! A TOML file can hold defaults for the command line flags:
//!
//! ```toml
//! munged-version = "1.4.2"
//! annotate = false
//! diff = false
//! ```
//!
//! Flags given on the command line always win over values from the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::munge::MungeOptions;

/// Version stamped when neither the command line nor a config file sets one
pub const DEFAULT_MUNGED_VERSION: &str = "munged-version";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub munged_version: String,
    pub annotate: bool,
    pub diff: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            munged_version: DEFAULT_MUNGED_VERSION.to_owned(),
            annotate: false,
            diff: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Options for the munge pass itself
    pub fn munge_options(&self) -> MungeOptions {
        MungeOptions {
            annotate: self.annotate,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            Config::from_toml("").expect("Failed to parse empty config"),
            Config::default()
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config =
            Config::from_toml("annotate = true\n").expect("Failed to parse partial config");
        assert!(config.annotate);
        assert!(!config.diff);
        assert_eq!(config.munged_version, DEFAULT_MUNGED_VERSION);
        assert!(config.munge_options().annotate);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml("munged-version = \"2.0.1\"\ndiff = true\n")
            .expect("Failed to parse config");
        assert_eq!(config.munged_version, "2.0.1");
        assert!(config.diff);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::from_toml("verbose = 3\n").is_err());
    }
}
