// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Prediction dispatch: routes a batch to the right calling convention.
//!
//! A one-request batch goes through `predict_single`; anything larger goes
//! through `predict_batch`. Failures propagate untouched, and a service that
//! returns the wrong number of results is treated as a failure of the batch.

use crate::batch::Batch;
use crate::{CallingConvention, Device, Prediction, PredictionError, PredictionService, Request};

/// Predictions for one batch, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    /// One prediction per request.
    pub predictions: Vec<Prediction>,
    /// Convention that produced them.
    pub convention: CallingConvention,
}

/// Runs one batch through `service`.
pub fn dispatch(
    batch: &Batch<Request>,
    service: &dyn PredictionService,
    device: Device,
) -> Result<Dispatched, PredictionError> {
    let requests = batch.items();
    let convention = CallingConvention::for_batch_len(requests.len());

    let predictions = match (convention, requests) {
        (CallingConvention::Single, [request]) => {
            vec![service.predict_single(request, device)?]
        }
        _ => service.predict_batch(requests, device)?,
    };

    if predictions.len() != requests.len() {
        return Err(PredictionError::new(format!(
            "service '{}' returned {} results for {} requests",
            service.name(),
            predictions.len(),
            requests.len(),
        )));
    }

    Ok(Dispatched {
        predictions,
        convention,
    })
}
