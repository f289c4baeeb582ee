// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model resolution: artifact type tag → task variant + bound service.

use crate::{ArtifactLoader, Device, PredictionService, RuntimeError, TaskVariant};

/// Tag reported when the artifact configuration has no `model.type`.
const MISSING_TAG: &str = "<missing>";

/// A prediction service together with the task it was bound for.
pub struct ResolvedModel {
    /// Bound inference backend.
    pub service: Box<dyn PredictionService>,
    /// Task selected from the artifact's type tag.
    pub task: TaskVariant,
}

impl std::fmt::Debug for ResolvedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedModel")
            .field("service", &self.service.name())
            .field("task", &self.task)
            .finish()
    }
}

/// Loads the artifact at `location` and selects the task it serves.
///
/// Fails with [`RuntimeError::UnsupportedModel`] when the type tag is neither
/// role-labeling nor coreference; in that case no service is bound.
pub fn resolve(
    loader: &dyn ArtifactLoader,
    location: &str,
    device: Device,
    overrides: &str,
) -> Result<ResolvedModel, RuntimeError> {
    let artifact = loader.load(location, device, overrides)?;
    tracing::debug!("{}", artifact.summary());

    let tag = artifact.model_type().unwrap_or(MISSING_TAG);
    let task = TaskVariant::from_model_type(tag).ok_or_else(|| {
        RuntimeError::UnsupportedModel {
            model_type: tag.to_string(),
        }
    })?;
    tracing::info!("model type '{tag}' resolved to task '{task}'");

    let service = artifact.into_service(task, device)?;
    Ok(ResolvedModel { service, task })
}
