// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # batch-runtime
//!
//! The batching and dispatch engine behind `predict-batch`.
//!
//! The runtime reads newline-delimited text, turns each non-blank line into a
//! task-specific request, groups requests into fixed-size batches, runs each
//! batch through an opaque prediction service and writes one formatted line
//! per input record, in input order.
//!
//! ```text
//! RecordReader ─► TaskVariant::adapt ─► BatchAccumulator ─► dispatch ─► OutputSink
//!                        ▲                                     │
//!                        └──── resolve(ArtifactLoader) ────────┘
//! ```
//!
//! - [`resolve`](resolver::resolve) maps the artifact's type tag to a
//!   [`TaskVariant`] and binds a [`PredictionService`].
//! - [`dispatch`](dispatch::dispatch) calls `predict_single` for one-request
//!   batches and `predict_batch` otherwise.
//! - [`PredictionEngine`] wires everything behind a type-state pipeline.
//!
//! Execution is strictly sequential: one batch in flight, blocking calls, no
//! retries.

mod artifact;
pub mod batch;
mod config;
pub mod dispatch;
mod engine;
mod error;
mod metrics;
pub mod reader;
pub mod resolver;
mod service;
pub mod sink;
pub mod synthetic;
mod task;

pub use artifact::{ArchiveArtifactLoader, Artifact, ArtifactLoader};
pub use batch::{Batch, BatchAccumulator, BatchStatus};
pub use config::RunConfig;
pub use engine::{EngineState, Idle, PredictionEngine, Ready};
pub use error::{PredictionError, RuntimeError};
pub use metrics::RunMetrics;
pub use reader::{RawLine, RecordReader};
pub use resolver::ResolvedModel;
pub use service::{CallingConvention, Device, Prediction, PredictionService};
pub use sink::{Destination, OutputSink};
pub use synthetic::SyntheticPredictor;
pub use task::{Request, TaskVariant};
