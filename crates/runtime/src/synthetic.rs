// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Synthetic prediction backend.
//!
//! [`SyntheticPredictor`] is the backend bound to archives loaded from disk.
//! It tokenises the input and returns structurally valid but empty
//! annotations:
//!
//! - role-labeling: `{"verbs": [], "words": [...]}`
//! - coreference: `{"document": [...], "clusters": [], "top_spans": []}`
//!
//! It exercises the complete batching pipeline end-to-end without a numeric
//! inference engine. Real backends implement [`PredictionService`] and are
//! bound by their own [`ArtifactLoader`](crate::ArtifactLoader).

use crate::{Device, Prediction, PredictionError, PredictionService, Request, TaskVariant};
use model_archive::LoadedArchive;
use serde_json::json;

/// Tokenising stand-in for a trained predictor.
pub struct SyntheticPredictor {
    task: TaskVariant,
    // Keeps an unpacked archive alive for as long as the service is in use.
    _archive: Option<LoadedArchive>,
}

impl SyntheticPredictor {
    /// Creates a predictor with no backing artifact.
    pub fn new(task: TaskVariant) -> Self {
        Self {
            task,
            _archive: None,
        }
    }

    /// Creates a predictor bound to a loaded artifact.
    pub fn from_archive(task: TaskVariant, archive: LoadedArchive) -> Self {
        Self {
            task,
            _archive: Some(archive),
        }
    }

    fn annotate(&self, request: &Request) -> Result<Prediction, PredictionError> {
        if request.task() != self.task {
            return Err(PredictionError::new(format!(
                "{} predictor received a {} request",
                self.task,
                request.task(),
            )));
        }

        let tokens = tokenize(request.text());
        let value = match self.task {
            TaskVariant::RoleLabeling => json!({
                "verbs": [],
                "words": tokens,
            }),
            TaskVariant::Coreference => json!({
                "document": tokens,
                "clusters": [],
                "top_spans": [],
            }),
        };
        Ok(Prediction(value))
    }
}

impl PredictionService for SyntheticPredictor {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn predict_single(
        &self,
        request: &Request,
        device: Device,
    ) -> Result<Prediction, PredictionError> {
        tracing::trace!("synthetic predict_single on {device}");
        self.annotate(request)
    }

    fn predict_batch(
        &self,
        requests: &[Request],
        device: Device,
    ) -> Result<Vec<Prediction>, PredictionError> {
        tracing::trace!("synthetic predict_batch of {} on {device}", requests.len());
        requests.iter().map(|r| self.annotate(r)).collect()
    }
}

/// Splits on whitespace and detaches leading/trailing ASCII punctuation.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let core_start = word
            .find(|c: char| !c.is_ascii_punctuation())
            .unwrap_or(word.len());
        let core_end = word
            .rfind(|c: char| !c.is_ascii_punctuation())
            .map(|i| i + word[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(core_start);

        tokens.extend(word[..core_start].chars().map(String::from));
        if core_start < core_end {
            tokens.push(word[core_start..core_end].to_string());
        }
        tokens.extend(word[core_end.max(core_start)..].chars().map(String::from));
    }
    tokens
}
