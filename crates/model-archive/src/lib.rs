// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-archive
//!
//! Loads the model artifacts consumed by the batch prediction runtime.
//!
//! An artifact is a bundle holding a trained model's configuration and
//! weights. This crate does not run inference: it only finds the bundle,
//! unpacks it, and exposes what the runtime needs to pick a task and bind a
//! prediction backend:
//!
//! - [`ArchiveLoader`]: loads from a directory, a `.tar.gz` file or a URL.
//! - [`ArchiveConfig`]: the `config.json` tree, with overrides applied.
//! - [`WeightsInfo`]: location, size and format of the weights file.
//!
//! # Example
//! ```no_run
//! use model_archive::ArchiveLoader;
//!
//! let archive = ArchiveLoader::new()
//!     .load("https://example.org/models/srl-model.tar.gz")
//!     .unwrap();
//! assert_eq!(archive.model_type(), Some("srl"));
//! ```

mod config;
mod error;
pub mod fetch;
mod loader;
mod weights;

pub use config::ArchiveConfig;
pub use error::ArchiveError;
pub use loader::{ArchiveLoader, LoadedArchive, CONFIG_FILE};
pub use weights::{WeightsFormat, WeightsInfo, DEFAULT_WEIGHTS_FILES};
