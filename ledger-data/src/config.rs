// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! # Codec Configuration
//!
//! Limits and strictness switches applied by the binary and JSON parsers.
//!
//! ## Configuration Sources (in order of precedence)
//!
//! 1. Environment variables (prefixed with `LEDGER_DATA_`)
//! 2. Configuration file (if specified)
//! 3. Default values
//!
//! ```toml
//! [binary]
//! max_depth = 32
//! max_blob_len = 918744
//!
//! [json]
//! strict_fields = false
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::binary::MAX_VL_LENGTH;

const ENV_PREFIX: &str = "LEDGER_DATA_";

/// Largest nesting depth accepted by [`CodecConfig::validate`].
pub const MAX_DEPTH_LIMIT: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Binary parser limits
    pub binary: BinaryConfig,

    /// JSON parser behaviour
    pub json: JsonConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryConfig {
    /// Maximum nesting of objects and arrays
    pub max_depth: usize,

    /// Maximum length of a variable-length field in bytes
    pub max_blob_len: usize,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_blob_len: MAX_VL_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Reject keys that do not name a known field instead of skipping them
    pub strict_fields: bool,
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: CodecConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `LEDGER_DATA_*` environment variables on top
    /// of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Environment variables
    /// 2. Config file (if specified and present)
    /// 3. Default values
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                config = Self::from_file(path)?;
            } else {
                warn!(
                    "config file {} not found, using defaults",
                    path.display()
                );
            }
        }

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from a variable lookup. `lookup` receives the full
    /// variable name, e.g. `LEDGER_DATA_BINARY_MAX_DEPTH`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_env = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = get_env("BINARY_MAX_DEPTH") {
            self.binary.max_depth = parse_env(key, value)?;
        }
        if let Some((key, value)) = get_env("BINARY_MAX_BLOB_LEN") {
            self.binary.max_blob_len = parse_env(key, value)?;
        }
        if let Some((_, value)) = get_env("JSON_STRICT_FIELDS") {
            self.json.strict_fields = value.to_lowercase() == "true";
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binary.max_depth == 0 || self.binary.max_depth > MAX_DEPTH_LIMIT
        {
            return Err(ConfigError::Validation(format!(
                "binary.max_depth must be between 1 and {MAX_DEPTH_LIMIT}"
            )));
        }
        if self.binary.max_blob_len > MAX_VL_LENGTH {
            return Err(ConfigError::Validation(format!(
                "binary.max_blob_len cannot exceed {MAX_VL_LENGTH}"
            )));
        }
        Ok(())
    }
}

fn parse_env(key: String, value: String) -> Result<usize, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CodecConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.binary.max_blob_len, MAX_VL_LENGTH);
        assert!(!config.json.strict_fields);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[binary]\nmax_depth = 8\n\n[json]\nstrict_fields = true"
        )
            .unwrap();

        let config = CodecConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.binary.max_depth, 8);
        assert_eq!(config.binary.max_blob_len, MAX_VL_LENGTH);
        assert!(config.json.strict_fields);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            CodecConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.binary, BinaryConfig::default());
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LEDGER_DATA_BINARY_MAX_DEPTH", "4"),
            ("LEDGER_DATA_JSON_STRICT_FIELDS", "TRUE"),
        ]
        .into_iter()
        .collect();

        let mut config = CodecConfig::default();
        config
            .apply_env(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.binary.max_depth, 4);
        assert!(config.json.strict_fields);
    }

    #[test]
    fn env_rejects_garbage() {
        let mut config = CodecConfig::default();
        let err = config
            .apply_env(|name| {
                (name == "LEDGER_DATA_BINARY_MAX_BLOB_LEN")
                    .then(|| "lots".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn validation_bounds() {
        let mut config = CodecConfig::default();
        config.binary.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = CodecConfig::default();
        config.binary.max_blob_len = MAX_VL_LENGTH + 1;
        assert!(config.validate().is_err());
    }
}
