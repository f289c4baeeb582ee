// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact loading contract and the archive-backed implementation.
//!
//! The runtime never looks inside a model. It asks an [`ArtifactLoader`] for
//! an [`Artifact`], reads the artifact's type tag, and lets the artifact bind
//! a [`PredictionService`] for the chosen task. Test doubles implement these
//! two traits directly.

use crate::synthetic::SyntheticPredictor;
use crate::{Device, PredictionService, RuntimeError, TaskVariant};
use model_archive::{ArchiveLoader, LoadedArchive};
use std::path::PathBuf;

/// A loaded model artifact.
pub trait Artifact {
    /// Declared model type tag, if the configuration has one.
    fn model_type(&self) -> Option<&str>;

    /// One-line description for logs.
    fn summary(&self) -> String;

    /// Binds a prediction service for `task` on `device`.
    ///
    /// The service owns whatever resources the artifact allocated; they are
    /// released when it is dropped.
    fn into_service(
        self: Box<Self>,
        task: TaskVariant,
        device: Device,
    ) -> Result<Box<dyn PredictionService>, RuntimeError>;
}

/// Loads artifacts from a location (path or URL).
pub trait ArtifactLoader {
    /// Loads the artifact at `location`, applying `overrides` to its
    /// configuration.
    fn load(
        &self,
        location: &str,
        device: Device,
        overrides: &str,
    ) -> Result<Box<dyn Artifact>, RuntimeError>;
}

/// Loads artifacts with [`model_archive`] and binds the synthetic backend.
#[derive(Debug, Clone, Default)]
pub struct ArchiveArtifactLoader {
    weights_file: Option<PathBuf>,
}

impl ArchiveArtifactLoader {
    /// Creates a loader using the artifact's default weights file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific weights file.
    pub fn with_weights_file(mut self, weights_file: Option<PathBuf>) -> Self {
        self.weights_file = weights_file;
        self
    }
}

impl ArtifactLoader for ArchiveArtifactLoader {
    fn load(
        &self,
        location: &str,
        device: Device,
        overrides: &str,
    ) -> Result<Box<dyn Artifact>, RuntimeError> {
        tracing::info!("loading artifact '{location}' for {device}");
        let archive = ArchiveLoader::new()
            .with_overrides(overrides)
            .with_weights_file(self.weights_file.clone())
            .load(location)?;
        Ok(Box::new(archive))
    }
}

impl Artifact for LoadedArchive {
    fn model_type(&self) -> Option<&str> {
        LoadedArchive::model_type(self)
    }

    fn summary(&self) -> String {
        LoadedArchive::summary(self)
    }

    fn into_service(
        self: Box<Self>,
        task: TaskVariant,
        device: Device,
    ) -> Result<Box<dyn PredictionService>, RuntimeError> {
        tracing::info!(
            "binding synthetic {} predictor on {device}",
            task.predictor_name(),
        );
        Ok(Box::new(SyntheticPredictor::from_archive(task, *self)))
    }
}
