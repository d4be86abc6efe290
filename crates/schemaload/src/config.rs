// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Loader configuration.
//!
//! Supports both programmatic and file-based configuration.
//!
//! ```toml
//! module_suffix = "_generated"
//! file_extension = ".schema"
//! type_url_prefix = "type.googleapis.com/"
//! strict_symbols = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::type_url::TYPE_URL_PREFIX;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Naming conventions and checks applied by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Suffix every load request name must carry (`foo.bar_generated`).
    #[serde(default = "default_module_suffix")]
    pub module_suffix: String,

    /// Extension of schema file paths inside bundles (`foo/bar.schema`).
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Prefix used when packing envelopes.
    #[serde(default = "default_type_url_prefix")]
    pub type_url_prefix: String,

    /// Reject files whose declared symbols are missing from the definition.
    #[serde(default = "default_true")]
    pub strict_symbols: bool,
}

fn default_module_suffix() -> String {
    "_generated".to_string()
}

fn default_file_extension() -> String {
    ".schema".to_string()
}

fn default_type_url_prefix() -> String {
    TYPE_URL_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            module_suffix: default_module_suffix(),
            file_extension: default_file_extension(),
            type_url_prefix: default_type_url_prefix(),
            strict_symbols: true,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.module_suffix.is_empty() {
            return Err(ConfigError::Invalid("module_suffix is empty".into()));
        }
        if self.module_suffix.contains('.') || self.module_suffix.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "module_suffix {:?} must not contain '.' or '/'",
                self.module_suffix
            )));
        }
        if !self.file_extension.starts_with('.') || self.file_extension.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "file_extension {:?} must start with '.'",
                self.file_extension
            )));
        }
        if !self.type_url_prefix.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "type_url_prefix {:?} must end with '/'",
                self.type_url_prefix
            )));
        }
        Ok(())
    }

    /// Convert a load request name into the schema file path it denotes.
    ///
    /// `"foo.bar_generated"` becomes `"foo/bar.schema"`. Returns `None` when
    /// the name lacks the configured suffix or has nothing in front of it.
    pub fn module_to_file_name(&self, module: &str) -> Option<String> {
        let stem = module.strip_suffix(&self.module_suffix)?;
        if stem.is_empty() {
            return None;
        }
        Some(format!("{}{}", stem.replace('.', "/"), self.file_extension))
    }

    /// Inverse of [`module_to_file_name`](Self::module_to_file_name).
    pub fn file_to_module_name(&self, file_name: &str) -> String {
        let stem = file_name
            .strip_suffix(&self.file_extension)
            .unwrap_or(file_name);
        format!("{}{}", stem.replace('/', "."), self.module_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = LoaderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.module_suffix, "_generated");
        assert_eq!(config.file_extension, ".schema");
    }

    #[test]
    fn test_module_file_name_conversion() {
        let config = LoaderConfig::default();
        assert_eq!(
            config.module_to_file_name("foo.bar_generated").as_deref(),
            Some("foo/bar.schema")
        );
        assert_eq!(
            config.file_to_module_name("a/b.schema"),
            "a.b_generated".to_string()
        );
        assert!(config.module_to_file_name("foo.bar").is_none());
        assert!(config.module_to_file_name("_generated").is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = LoaderConfig::from_toml("module_suffix = \"_pb2\"\n").expect("parse");
        assert_eq!(config.module_suffix, "_pb2");
        assert_eq!(config.file_extension, ".schema");
        assert!(config.strict_symbols);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = LoaderConfig {
            file_extension: "schema".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LoaderConfig {
            type_url_prefix: "type.googleapis.com".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "file_extension = \".proto\"").expect("write");
        writeln!(file, "strict_symbols = false").expect("write");

        let config = LoaderConfig::from_file(file.path()).expect("load");
        assert_eq!(config.file_extension, ".proto");
        assert!(!config.strict_symbols);
    }
}
