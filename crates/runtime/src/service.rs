// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The prediction service contract.
//!
//! A [`PredictionService`] is the opaque inference backend bound to a loaded
//! artifact. It offers two calling conventions that are **not**
//! interchangeable:
//!
//! - [`predict_single`](PredictionService::predict_single): one request in,
//!   one result out. Lowest latency for a lone record.
//! - [`predict_batch`](PredictionService::predict_batch): an ordered slice of
//!   requests in, an equally long and equally ordered vector out.
//!
//! The [`dispatch`](crate::dispatch) module decides which one to call.
//! Both conventions receive the device selector.

use crate::{PredictionError, Request};

// ── Device selector ────────────────────────────────────────────

/// Compute device selector: `-1` (or any negative id) means CPU, `n >= 0`
/// selects accelerator `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Device(i32);

impl Device {
    /// The CPU (no accelerator).
    pub const CPU: Device = Device(-1);

    /// Creates a selector from a raw device id.
    pub fn new(id: i32) -> Self {
        if id < 0 {
            Self::CPU
        } else {
            Self(id)
        }
    }

    /// Raw device id as passed on the command line.
    pub fn id(&self) -> i32 {
        self.0
    }

    /// Returns `true` if no accelerator is selected.
    pub fn is_cpu(&self) -> bool {
        self.0 < 0
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::CPU
    }
}

impl From<i32> for Device {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_cpu() {
            f.write_str("cpu")
        } else {
            write!(f, "cuda:{}", self.0)
        }
    }
}

// ── Prediction ─────────────────────────────────────────────────

/// One opaque prediction, as returned by the service.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Prediction(pub serde_json::Value);

impl Prediction {
    /// Borrows the underlying JSON value.
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Prediction {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

// ── Service contract ───────────────────────────────────────────

/// Which calling convention served a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallingConvention {
    /// `predict_single` on a one-request batch.
    Single,
    /// `predict_batch` on a multi-request batch.
    Batch,
}

impl CallingConvention {
    /// Picks the convention for a batch of `len` requests.
    pub fn for_batch_len(len: usize) -> Self {
        if len == 1 {
            Self::Single
        } else {
            Self::Batch
        }
    }
}

/// An inference backend bound to a loaded model.
///
/// Calls are synchronous and may block for as long as inference takes;
/// there is no timeout and no cancellation.
pub trait PredictionService {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Predicts a single request.
    fn predict_single(
        &self,
        request: &Request,
        device: Device,
    ) -> Result<Prediction, PredictionError>;

    /// Predicts a batch of requests, returning results in request order.
    fn predict_batch(
        &self,
        requests: &[Request],
        device: Device,
    ) -> Result<Vec<Prediction>, PredictionError>;

    /// Renders a prediction as one output line, trailing newline included.
    ///
    /// The default is compact JSON followed by `\n`.
    fn format(&self, prediction: &Prediction) -> Result<String, PredictionError> {
        let mut line = serde_json::to_string(prediction.as_json())
            .map_err(|e| PredictionError::with_source("cannot serialise prediction", e))?;
        line.push('\n');
        Ok(line)
    }
}

impl<S: PredictionService + ?Sized> PredictionService for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict_single(
        &self,
        request: &Request,
        device: Device,
    ) -> Result<Prediction, PredictionError> {
        (**self).predict_single(request, device)
    }

    fn predict_batch(
        &self,
        requests: &[Request],
        device: Device,
    ) -> Result<Vec<Prediction>, PredictionError> {
        (**self).predict_batch(requests, device)
    }

    fn format(&self, prediction: &Prediction) -> Result<String, PredictionError> {
        (**self).format(prediction)
    }
}
