// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Weights file discovery and header inspection.
//!
//! Weight *data* is never read here; the actual numeric inference is owned by
//! whichever prediction backend gets bound to the artifact. For SafeTensors
//! files the header is parsed through a memory map to report tensor count and
//! payload size, which is enough to reject truncated or corrupt downloads
//! early.

use crate::ArchiveError;
use std::path::{Path, PathBuf};

/// Weights filenames probed, in order, when no explicit file is given.
pub const DEFAULT_WEIGHTS_FILES: [&str; 3] = ["weights.th", "best.th", "model.safetensors"];

/// On-disk format of a weights file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightsFormat {
    /// HuggingFace SafeTensors, header inspected.
    SafeTensors { tensors: usize, payload_bytes: usize },
    /// Any other format; treated as an opaque blob.
    Opaque,
}

/// Metadata for the weights file of an artifact.
#[derive(Debug, Clone)]
pub struct WeightsInfo {
    /// Absolute or artifact-relative path of the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format.
    pub format: WeightsFormat,
}

impl WeightsInfo {
    /// Locates and inspects the weights file.
    ///
    /// `explicit` wins over the defaults; a relative `explicit` path is
    /// resolved against `artifact_dir` first and the working directory second.
    pub fn locate(artifact_dir: &Path, explicit: Option<&Path>) -> Result<Self, ArchiveError> {
        let path = match explicit {
            Some(p) => {
                let in_artifact = artifact_dir.join(p);
                if in_artifact.is_file() {
                    in_artifact
                } else if p.is_file() {
                    p.to_path_buf()
                } else {
                    return Err(ArchiveError::MissingWeights(p.to_path_buf()));
                }
            }
            None => DEFAULT_WEIGHTS_FILES
                .iter()
                .map(|name| artifact_dir.join(name))
                .find(|p| p.is_file())
                .ok_or_else(|| ArchiveError::MissingWeights(artifact_dir.to_path_buf()))?,
        };

        Self::inspect(&path)
    }

    /// Reads size and format information for a weights file.
    pub fn inspect(path: &Path) -> Result<Self, ArchiveError> {
        let size_bytes = std::fs::metadata(path)?.len();

        let format = if path.extension().is_some_and(|ext| ext == "safetensors") {
            read_safetensors_header(path)?
        } else {
            tracing::debug!(
                "weights '{}' are not SafeTensors, skipping header inspection",
                path.display(),
            );
            WeightsFormat::Opaque
        };

        Ok(Self {
            path: path.to_path_buf(),
            size_bytes,
            format,
        })
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        let mb = self.size_bytes as f64 / (1024.0 * 1024.0);
        match &self.format {
            WeightsFormat::SafeTensors { tensors, .. } => format!(
                "{} ({mb:.2} MB, safetensors, {tensors} tensors)",
                self.path.display(),
            ),
            WeightsFormat::Opaque => format!("{} ({mb:.2} MB)", self.path.display()),
        }
    }
}

fn read_safetensors_header(path: &Path) -> Result<WeightsFormat, ArchiveError> {
    let weights_error = |detail: String| ArchiveError::Weights {
        path: path.to_path_buf(),
        detail,
    };

    let file = std::fs::File::open(path)?;
    // Memory-map so only the header pages are touched.
    let mmap = unsafe { memmap2::Mmap::map(&file) }
        .map_err(|e| weights_error(format!("mmap failed: {e}")))?;

    let tensors = safetensors::SafeTensors::deserialize(&mmap)
        .map_err(|e| weights_error(format!("SafeTensors parse error: {e}")))?;

    let payload_bytes = tensors
        .tensors()
        .iter()
        .map(|(_, view)| view.data().len())
        .sum();

    Ok(WeightsFormat::SafeTensors {
        tensors: tensors.len(),
        payload_bytes,
    })
}
