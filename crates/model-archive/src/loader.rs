// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact loading from directories, `.tar.gz` archives and URLs.
//!
//! An artifact contains:
//! - `config.json`: the model configuration (see [`ArchiveConfig`]).
//! - a weights file: `weights.th`, `best.th` or `model.safetensors`
//!   (see [`WeightsInfo`]).
//!
//! Compressed archives are unpacked into a temporary directory owned by the
//! returned [`LoadedArchive`]; dropping it removes the unpacked files.

use crate::{fetch, ArchiveConfig, ArchiveError, WeightsInfo};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Configuration filename inside an artifact.
pub const CONFIG_FILE: &str = "config.json";

/// Loads model artifacts.
///
/// # Example
/// ```no_run
/// use model_archive::ArchiveLoader;
///
/// let archive = ArchiveLoader::new()
///     .with_overrides(r#"{"model.type": "srl"}"#)
///     .load("./models/srl-model.tar.gz")
///     .unwrap();
/// println!("{}", archive.summary());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveLoader {
    overrides: String,
    weights_file: Option<PathBuf>,
}

/// A loaded artifact: configuration plus weights metadata.
#[derive(Debug)]
pub struct LoadedArchive {
    location: String,
    root: PathBuf,
    config: ArchiveConfig,
    weights: WeightsInfo,
    // Held for its Drop: removes the unpacked archive.
    _unpacked: Option<tempfile::TempDir>,
}

impl ArchiveLoader {
    /// Creates a loader with no overrides and default weights discovery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a JSON overrides string merged into the configuration.
    pub fn with_overrides(mut self, overrides: impl Into<String>) -> Self {
        self.overrides = overrides.into();
        self
    }

    /// Uses a specific weights file instead of the artifact default.
    pub fn with_weights_file(mut self, weights_file: Option<PathBuf>) -> Self {
        self.weights_file = weights_file;
        self
    }

    /// Loads the artifact at `location` (directory, archive file or URL).
    ///
    /// Steps:
    /// 1. Download the archive if `location` is remote.
    /// 2. Unpack it if it is a file.
    /// 3. Parse `config.json` and apply overrides.
    /// 4. Locate and inspect the weights file.
    pub fn load(&self, location: &str) -> Result<LoadedArchive, ArchiveError> {
        let (root, unpacked) = if fetch::is_remote(location) {
            let download = fetch::download(location)?;
            let dir = unpack(download.path())?;
            // The downloaded tarball is deleted here; only the unpacked copy is kept.
            (artifact_root(dir.path()), Some(dir))
        } else {
            let path = Path::new(location);
            if path.is_dir() {
                (path.to_path_buf(), None)
            } else if path.is_file() {
                let dir = unpack(path)?;
                (artifact_root(dir.path()), Some(dir))
            } else {
                return Err(ArchiveError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("artifact '{location}' does not exist"),
                )));
            }
        };

        let mut config = ArchiveConfig::from_file(&root.join(CONFIG_FILE))?;
        config.apply_overrides(&self.overrides)?;

        let weights = WeightsInfo::locate(&root, self.weights_file.as_deref())?;

        let archive = LoadedArchive {
            location: location.to_string(),
            root,
            config,
            weights,
            _unpacked: unpacked,
        };
        tracing::info!("{}", archive.summary());
        Ok(archive)
    }
}

impl LoadedArchive {
    /// The location this artifact was loaded from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Directory holding `config.json` and the weights.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration with overrides applied.
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Weights file metadata.
    pub fn weights(&self) -> &WeightsInfo {
        &self.weights
    }

    /// Declared model type tag.
    pub fn model_type(&self) -> Option<&str> {
        self.config.model_type()
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "artifact '{}': type={}, weights={}",
            self.location,
            self.model_type().unwrap_or("<missing>"),
            self.weights.summary(),
        )
    }
}

/// Unpacks a gzipped tarball into a fresh temporary directory.
fn unpack(path: &Path) -> Result<tempfile::TempDir, ArchiveError> {
    let extract_error = |detail: String| ArchiveError::Extract {
        path: path.to_path_buf(),
        detail,
    };

    let file = File::open(path)?;
    let dir = tempfile::Builder::new().prefix("artifact-").tempdir()?;

    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    archive
        .unpack(dir.path())
        .map_err(|e| extract_error(e.to_string()))?;

    tracing::debug!("unpacked '{}' into {}", path.display(), dir.path().display());
    Ok(dir)
}

/// Finds the directory holding `config.json`: either `dir` itself or its
/// single top-level subdirectory.
fn artifact_root(dir: &Path) -> PathBuf {
    if dir.join(CONFIG_FILE).is_file() {
        return dir.to_path_buf();
    }

    let subdirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();

    match subdirs.as_slice() {
        [only] if only.join(CONFIG_FILE).is_file() => only.clone(),
        _ => dir.to_path_buf(),
    }
}
