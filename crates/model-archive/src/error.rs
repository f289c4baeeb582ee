// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for artifact fetching, unpacking and configuration parsing.

use std::path::PathBuf;

/// Errors that can occur while loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// A file inside the artifact could not be read.
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    /// `config.json` is not valid JSON.
    #[error("failed to parse artifact configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The artifact does not contain a configuration file.
    #[error("artifact has no configuration file at '{}'", .0.display())]
    MissingConfig(PathBuf),

    /// The overrides string is not a JSON object.
    #[error("invalid configuration overrides: {0}")]
    InvalidOverrides(String),

    /// The compressed archive could not be unpacked.
    #[error("failed to extract archive '{}': {detail}", path.display())]
    Extract { path: PathBuf, detail: String },

    /// A remote artifact could not be downloaded.
    #[error("failed to fetch '{url}': {detail}")]
    Fetch { url: String, detail: String },

    /// No weights file was found in the artifact.
    #[error("no weights file found in '{}'", .0.display())]
    MissingWeights(PathBuf),

    /// The weights file exists but its header is unreadable.
    #[error("invalid weights file '{}': {detail}", path.display())]
    Weights { path: PathBuf, detail: String },
}
