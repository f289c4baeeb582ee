// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Task variants and their request shapes.
//!
//! The task is chosen once, from the artifact's model type tag, and passed
//! explicitly through the pipeline. Each variant owns two rules:
//!
//! | Variant        | Request             | Predictor name            |
//! |----------------|---------------------|---------------------------|
//! | `RoleLabeling` | `{"sentence": ...}` | `semantic-role-labeling`  |
//! | `Coreference`  | `{"document": ...}` | `coreference-resolution`  |

use crate::reader::RawLine;
use crate::{Prediction, PredictionError, PredictionService};

/// The prediction task served by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskVariant {
    /// Predicate-argument structure of a sentence.
    RoleLabeling,
    /// Clusters of spans referring to the same entity in a document.
    Coreference,
}

impl TaskVariant {
    /// All supported variants.
    pub const ALL: [TaskVariant; 2] = [TaskVariant::RoleLabeling, TaskVariant::Coreference];

    /// Maps a model type tag to a task (case-insensitive).
    ///
    /// Returns `None` for any tag without an adapter.
    pub fn from_model_type(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "role-labeling" | "srl" | "semantic-role-labeling" => Some(Self::RoleLabeling),
            "coreference" | "coref" | "coreference-resolution" => Some(Self::Coreference),
            _ => None,
        }
    }

    /// Canonical name of the task.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleLabeling => "role-labeling",
            Self::Coreference => "coreference",
        }
    }

    /// Name of the predictor a backend should construct for this task.
    pub fn predictor_name(&self) -> &'static str {
        match self {
            Self::RoleLabeling => "semantic-role-labeling",
            Self::Coreference => "coreference-resolution",
        }
    }

    /// Builds the request for a record.
    pub fn adapt(&self, line: &RawLine) -> Request {
        let text = line.text().to_string();
        match self {
            Self::RoleLabeling => Request::Sentence { sentence: text },
            Self::Coreference => Request::Document { document: text },
        }
    }

    /// Renders one prediction as a single output line.
    ///
    /// Rendering belongs to the service's serialization contract; the task
    /// only routes to it.
    pub fn format(
        &self,
        service: &dyn PredictionService,
        prediction: &Prediction,
    ) -> Result<String, PredictionError> {
        service.format(prediction)
    }
}

impl std::fmt::Display for TaskVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task-specific request built from one input record.
///
/// Serialises to the flat JSON object the prediction service expects.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Request {
    /// Role-labeling input.
    Sentence { sentence: String },
    /// Coreference input.
    Document { document: String },
}

impl Request {
    /// The text carried by the request.
    pub fn text(&self) -> &str {
        match self {
            Self::Sentence { sentence } => sentence,
            Self::Document { document } => document,
        }
    }

    /// The task this request shape belongs to.
    pub fn task(&self) -> TaskVariant {
        match self {
            Self::Sentence { .. } => TaskVariant::RoleLabeling,
            Self::Document { .. } => TaskVariant::Coreference,
        }
    }
}
