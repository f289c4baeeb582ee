// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact configuration (`config.json`) parsing and overrides.
//!
//! The configuration is kept as an untyped JSON tree: the only field the
//! runtime relies on is the model type tag at `model.type`, and everything
//! else is passed through untouched to whichever predictor gets bound.
//!
//! # Format
//! ```json
//! {
//!   "dataset_reader": { "type": "srl" },
//!   "model": {
//!     "type": "srl",
//!     "text_field_embedder": { ... }
//!   }
//! }
//! ```
//!
//! # Overrides
//! Overrides are a JSON object merged on top of the file. Nested objects merge
//! key by key, any other value replaces the original. Dotted keys address
//! nested fields, so `{"model.type": "coref"}` and
//! `{"model": {"type": "coref"}}` are equivalent.

use crate::ArchiveError;
use serde_json::{Map, Value};
use std::path::Path;

/// Parsed artifact configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConfig {
    root: Value,
}

impl ArchiveConfig {
    /// Loads a configuration from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, ArchiveError> {
        if !path.is_file() {
            return Err(ArchiveError::MissingConfig(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ArchiveError> {
        let root: Value = serde_json::from_str(json)?;
        Ok(Self { root })
    }

    /// Returns the declared model type tag (`model.type`), if any.
    pub fn model_type(&self) -> Option<&str> {
        self.get("model.type").and_then(Value::as_str)
    }

    /// Looks up a value by dotted path (e.g. `"model.encoder.type"`).
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        dotted
            .split('.')
            .try_fold(&self.root, |node, key| node.get(key))
    }

    /// Merges an overrides string into this configuration.
    ///
    /// An empty or whitespace-only string is a no-op.
    pub fn apply_overrides(&mut self, overrides: &str) -> Result<(), ArchiveError> {
        if overrides.trim().is_empty() {
            return Ok(());
        }

        let parsed: Value = serde_json::from_str(overrides)
            .map_err(|e| ArchiveError::InvalidOverrides(e.to_string()))?;
        let Value::Object(flat) = parsed else {
            return Err(ArchiveError::InvalidOverrides(
                "overrides must be a JSON object".into(),
            ));
        };

        let patch = unflatten(flat);
        tracing::debug!("applying configuration overrides: {patch}");
        merge(&mut self.root, patch);
        Ok(())
    }
}

/// Expands dotted keys into nested objects.
fn unflatten(flat: Map<String, Value>) -> Value {
    let mut out = Value::Object(Map::new());
    for (key, value) in flat {
        let value = match value {
            Value::Object(inner) => unflatten(inner),
            other => other,
        };

        let mut nested = value;
        for part in key.rsplit('.') {
            let mut wrapper = Map::new();
            wrapper.insert(part.to_string(), nested);
            nested = Value::Object(wrapper);
        }
        merge(&mut out, nested);
    }
    out
}

/// Recursively merges `patch` into `base`; `patch` wins on conflicts.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
