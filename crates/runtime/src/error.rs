// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the prediction runtime.

/// Errors that can occur while resolving a model or running predictions.
///
/// Every variant is fatal for a run: nothing is retried, and records after
/// the failure point are never processed.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The artifact declares a model type that has no task adapter.
    #[error("unsupported model type '{model_type}': the model must be role-labeling (srl) or coreference (coref)")]
    UnsupportedModel { model_type: String },

    /// The artifact could not be fetched, unpacked or parsed.
    #[error("artifact loading failed: {0}")]
    ArtifactLoad(#[from] model_archive::ArchiveError),

    /// The prediction service failed on a batch.
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Failure reported by a [`PredictionService`](crate::PredictionService).
#[derive(Debug, thiserror::Error)]
#[error("prediction failed: {message}")]
pub struct PredictionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl PredictionError {
    /// Creates an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The error message, without the source chain.
    pub fn message(&self) -> &str {
        &self.message
    }
}
