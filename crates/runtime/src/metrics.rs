// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run metrics.
//!
//! [`RunMetrics`] counts records and batches and times the prediction calls,
//! which is where nearly all wall-clock time of a run goes.

use crate::CallingConvention;
use std::time::Duration;

/// Aggregate metrics for one run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RunMetrics {
    /// Records read and emitted.
    pub records: usize,
    /// Blank lines skipped.
    pub skipped_lines: usize,
    /// Batches dispatched.
    pub batches: usize,
    /// Batches served by `predict_single`.
    pub single_calls: usize,
    /// Batches served by `predict_batch`.
    pub batch_calls: usize,
    /// Time spent inside the prediction service.
    pub predict_duration: Duration,
    /// Wall-clock time for the whole run.
    pub total_duration: Duration,
}

impl RunMetrics {
    /// Creates an empty metrics container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one dispatched batch.
    pub fn record_batch(&mut self, size: usize, convention: CallingConvention, elapsed: Duration) {
        self.batches += 1;
        self.records += size;
        self.predict_duration += elapsed;
        match convention {
            CallingConvention::Single => self.single_calls += 1,
            CallingConvention::Batch => self.batch_calls += 1,
        }
    }

    /// Mean records per batch (0 if nothing ran).
    pub fn mean_batch_size(&self) -> f64 {
        if self.batches == 0 {
            0.0
        } else {
            self.records as f64 / self.batches as f64
        }
    }

    /// Records processed per second of wall-clock time.
    pub fn throughput(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} records in {} batches ({} single, {} batched, mean {:.1}/batch), \
             {} blank lines skipped, predict {:.1?}, total {:.1?} ({:.1} records/s)",
            self.records,
            self.batches,
            self.single_calls,
            self.batch_calls,
            self.mean_batch_size(),
            self.skipped_lines,
            self.predict_duration,
            self.total_duration,
            self.throughput(),
        )
    }
}
