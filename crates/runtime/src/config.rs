// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! archive_path = "https://example.org/models/srl-model.tar.gz"
//! input_file = "sentences.txt"
//! output_file = "sentences.srl.jsonl"
//! batch_size = 16
//! cuda_device = -1
//! overrides = '{"model.type": "srl"}'
//! weights_file = "best.th"
//! ```
//!
//! Every key is optional in the file; missing keys take the defaults below.

use crate::{Device, RuntimeError};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration for one batch prediction run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Model artifact location: directory, `.tar.gz` file or URL.
    pub archive_path: String,
    /// Newline-delimited input text.
    pub input_file: PathBuf,
    /// Output file; `None` echoes predictions to the console.
    pub output_file: Option<PathBuf>,
    /// Maximum number of records per prediction call.
    pub batch_size: usize,
    /// Device selector; negative means CPU.
    pub cuda_device: i32,
    /// JSON overrides merged into the artifact configuration.
    pub overrides: String,
    /// Weights file to use instead of the artifact default.
    pub weights_file: Option<PathBuf>,
}

impl RunConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.archive_path.trim().is_empty() {
            return Err(RuntimeError::ConfigError("archive path is empty".into()));
        }
        self.batch_size()?;
        Ok(())
    }

    /// The batch size as a non-zero count.
    pub fn batch_size(&self) -> Result<NonZeroUsize, RuntimeError> {
        NonZeroUsize::new(self.batch_size).ok_or_else(|| {
            RuntimeError::ConfigError("batch size must be a positive integer".into())
        })
    }

    /// The device selector.
    pub fn device(&self) -> Device {
        Device::new(self.cuda_device)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            archive_path: String::new(),
            input_file: PathBuf::new(),
            output_file: None,
            batch_size: 1,
            cuda_device: -1,
            overrides: String::new(),
            weights_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = RunConfig::default();
        assert_eq!(c.batch_size, 1);
        assert_eq!(c.cuda_device, -1);
        assert!(c.device().is_cpu());
        assert!(c.output_file.is_none());
        assert!(c.overrides.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
archive_path = "/models/coref"
input_file = "docs.txt"
output_file = "docs.jsonl"
batch_size = 8
cuda_device = 0
"#;
        let c = RunConfig::from_toml(toml).unwrap();
        assert_eq!(c.archive_path, "/models/coref");
        assert_eq!(c.input_file, PathBuf::from("docs.txt"));
        assert_eq!(c.output_file, Some(PathBuf::from("docs.jsonl")));
        assert_eq!(c.batch_size().unwrap().get(), 8);
        assert_eq!(c.device(), Device::new(0));
        assert!(c.weights_file.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let c = RunConfig::from_toml("batch_size = 4").unwrap();
        assert_eq!(c.batch_size, 4);
        assert_eq!(c.cuda_device, -1);
        assert!(c.archive_path.is_empty());
    }

    #[test]
    fn test_bad_toml() {
        let result = RunConfig::from_toml("batch_size = \"many\"");
        assert!(matches!(result, Err(RuntimeError::ConfigError(_))));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = RunConfig {
            archive_path: "/models/srl".into(),
            batch_size: 32,
            overrides: r#"{"model.type":"srl"}"#.into(),
            ..Default::default()
        };
        let back = RunConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_validate() {
        let ok = RunConfig {
            archive_path: "/models/srl".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let zero = RunConfig {
            batch_size: 0,
            ..ok.clone()
        };
        assert!(matches!(zero.validate(), Err(RuntimeError::ConfigError(_))));

        let no_archive = RunConfig::default();
        assert!(no_archive.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let result = RunConfig::from_file(Path::new("/no/such/run.toml"));
        assert!(matches!(result, Err(RuntimeError::ConfigError(_))));
    }
}
