// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CLI configuration.
//!
//! ```toml
//! log_level = "info"
//! preload = ["bundles/base.json"]
//!
//! [loader]
//! module_suffix = "_generated"
//! file_extension = ".schema"
//! ```

use schemaload::LoaderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML render error: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Invalid loader section: {0}")]
    Loader(#[from] schemaload::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Log level or `EnvFilter` directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bundle files loaded into the registry before any command runs.
    #[serde(default)]
    pub preload: Vec<PathBuf>,

    /// Loader naming conventions and checks.
    #[serde(default)]
    pub loader: LoaderConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            preload: Vec::new(),
            loader: LoaderConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file.
    ///
    /// Relative `preload` entries are resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            for entry in &mut config.preload {
                if entry.is_relative() {
                    *entry = base.join(&*entry);
                }
            }
        }
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.log_level.trim();
        if level.is_empty() {
            return Err(ConfigError::Invalid("log_level is empty".into()));
        }
        // Directives such as "schemaload=debug" are left to EnvFilter.
        if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level {:?} (expected one of {})",
                level,
                LOG_LEVELS.join(", ")
            )));
        }
        if let Some(empty) = self.preload.iter().position(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid(format!("preload[{}] is empty", empty)));
        }
        self.loader.validate()?;
        Ok(())
    }

    /// Example configuration written by `gen-config`.
    pub fn example() -> Self {
        Self {
            log_level: "info".into(),
            preload: vec![PathBuf::from("bundles/base.json")],
            loader: LoaderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = CliConfig::from_toml("").expect("parse");
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_example_round_trips() {
        let example = CliConfig::example();
        let text = example.to_toml().expect("render");
        assert!(text.contains("[loader]"));
        assert_eq!(CliConfig::from_toml(&text).expect("parse"), example);
    }

    #[test]
    fn test_log_level_validation() {
        assert!(CliConfig::from_toml("log_level = \"DEBUG\"").is_ok());
        assert!(CliConfig::from_toml("log_level = \"schemaload=trace\"").is_ok());
        assert!(matches!(
            CliConfig::from_toml("log_level = \"loud\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_loader_section_is_validated() {
        let err = CliConfig::from_toml("[loader]\ntype_url_prefix = \"no-slash\"\n")
            .expect_err("invalid prefix");
        assert!(matches!(err, ConfigError::Loader(_)));
    }

    #[test]
    fn test_preload_resolved_against_config_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schemaload.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "preload = [\"a.json\", \"/abs/b.json\"]").expect("write");

        let config = CliConfig::from_file(&path).expect("load");
        assert_eq!(config.preload[0], dir.path().join("a.json"));
        assert_eq!(config.preload[1], PathBuf::from("/abs/b.json"));
    }
}
