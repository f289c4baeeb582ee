// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The prediction engine with a type-state–enforced pipeline.
//!
//! ```text
//! PredictionEngine<Idle>
//!     │  .resolve(loader)      load artifact, pick task, bind service
//!     ▼
//! PredictionEngine<Ready>
//!     │  .run(reader, sink)    read → adapt → batch → dispatch → emit
//!     ▼
//!   RunMetrics
//! ```
//!
//! `run` only exists on a `Ready` engine, so an unsupported or unloadable
//! artifact always fails before a single input line is read.

use crate::batch::{Batch, BatchAccumulator, BatchStatus};
use crate::dispatch::dispatch;
use crate::reader::{RawLine, RecordReader};
use crate::resolver::{resolve, ResolvedModel};
use crate::sink::OutputSink;
use crate::{
    ArtifactLoader, Device, PredictionService, Request, RunConfig, RunMetrics, RuntimeError,
    TaskVariant,
};
use std::io::{BufRead, Write};
use std::time::Instant;

// ── Type-state markers ─────────────────────────────────────────

/// Engine is configured but no model is bound.
#[derive(Debug)]
pub struct Idle;

/// A model is resolved and the engine can run.
#[derive(Debug)]
pub struct Ready {
    model: ResolvedModel,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Idle {}
    impl Sealed for super::Ready {}
}

/// Sealed trait for engine states.
pub trait EngineState: sealed::Sealed + std::fmt::Debug {}
impl EngineState for Idle {}
impl EngineState for Ready {}

// ── Engine ─────────────────────────────────────────────────────

/// The batch prediction engine.
///
/// # Example
/// ```no_run
/// use batch_runtime::{ArchiveArtifactLoader, OutputSink, PredictionEngine, RecordReader, RunConfig};
/// use std::io::BufReader;
///
/// # fn example() -> Result<(), batch_runtime::RuntimeError> {
/// let config = RunConfig {
///     archive_path: "./models/srl-model.tar.gz".into(),
///     batch_size: 8,
///     ..Default::default()
/// };
/// let engine = PredictionEngine::new(config).resolve(&ArchiveArtifactLoader::new())?;
///
/// let input = BufReader::new(std::fs::File::open("sentences.txt")?);
/// let mut sink = OutputSink::console();
/// let metrics = engine.run(RecordReader::new(input), &mut sink)?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PredictionEngine<S: EngineState = Idle> {
    config: RunConfig,
    state: S,
}

// ── Idle → Ready ───────────────────────────────────────────────

impl PredictionEngine<Idle> {
    /// Creates a new engine from the given configuration.
    pub fn new(config: RunConfig) -> Self {
        tracing::info!(
            "engine created: batch size {}, device {}",
            config.batch_size,
            config.device(),
        );
        Self { config, state: Idle }
    }

    /// Loads the artifact, selects the task and binds the prediction service.
    pub fn resolve(
        self,
        loader: &dyn ArtifactLoader,
    ) -> Result<PredictionEngine<Ready>, RuntimeError> {
        self.config.validate()?;

        let model = resolve(
            loader,
            &self.config.archive_path,
            self.config.device(),
            &self.config.overrides,
        )?;
        tracing::info!(
            "engine ready: task '{}', service '{}'",
            model.task,
            model.service.name(),
        );

        Ok(PredictionEngine {
            config: self.config,
            state: Ready { model },
        })
    }

    /// Convenience: builds a ready engine around an already bound service.
    pub fn from_service(
        config: RunConfig,
        task: TaskVariant,
        service: Box<dyn PredictionService>,
    ) -> Result<PredictionEngine<Ready>, RuntimeError> {
        config.batch_size()?;
        Ok(PredictionEngine {
            config,
            state: Ready {
                model: ResolvedModel { service, task },
            },
        })
    }
}

// ── Ready: run predictions ─────────────────────────────────────

impl PredictionEngine<Ready> {
    /// The task selected at resolution.
    pub fn task(&self) -> TaskVariant {
        self.state.model.task
    }

    /// The bound prediction service.
    pub fn service(&self) -> &dyn PredictionService {
        self.state.model.service.as_ref()
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every record of `reader` through the model and into `sink`.
    ///
    /// Records are batched in arrival order; a full batch is dispatched as
    /// soon as it fills and the trailing partial batch at end of input. The
    /// i-th record read produces the i-th line emitted. The first error stops
    /// the run; lines already emitted stay written.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut reader: RecordReader<R>,
        sink: &mut OutputSink<W>,
    ) -> Result<RunMetrics, RuntimeError> {
        let run_start = Instant::now();
        let task = self.task();
        let mut accumulator = BatchAccumulator::new(self.config.batch_size()?);
        let mut metrics = RunMetrics::new();

        tracing::debug!(
            "starting run: task '{task}', batch size {}",
            accumulator.batch_size(),
        );

        for line in reader.by_ref() {
            let line = line?;
            let request = task.adapt(&line);
            if accumulator.offer((line, request)) == BatchStatus::Ready {
                if let Some(batch) = accumulator.drain_if_ready() {
                    self.process(batch, sink, &mut metrics)?;
                }
            }
        }

        if let Some(batch) = accumulator.force_flush() {
            tracing::debug!("flushing final batch of {}", batch.len());
            self.process(batch, sink, &mut metrics)?;
        }

        sink.flush()?;
        metrics.skipped_lines = reader.skipped();
        metrics.total_duration = run_start.elapsed();
        tracing::info!("{}", metrics.summary());
        Ok(metrics)
    }

    /// Dispatches one batch and emits its results in order.
    fn process<W: Write>(
        &self,
        batch: Batch<(RawLine, Request)>,
        sink: &mut OutputSink<W>,
        metrics: &mut RunMetrics,
    ) -> Result<(), RuntimeError> {
        let service = self.service();
        let device: Device = self.config.device();
        let (lines, requests) = batch.unzip();

        let started = Instant::now();
        let dispatched = dispatch(&requests, service, device)?;
        let elapsed = started.elapsed();
        metrics.record_batch(requests.len(), dispatched.convention, elapsed);

        tracing::debug!(
            "batch {} ({} records, {:?}) predicted in {elapsed:.1?}",
            metrics.batches,
            requests.len(),
            dispatched.convention,
        );

        // A batch is emitted whole or not at all.
        let outputs = dispatched
            .predictions
            .iter()
            .map(|prediction| self.task().format(service, prediction))
            .collect::<Result<Vec<_>, _>>()?;

        for (line, output) in lines.into_iter().zip(&outputs) {
            sink.emit(&line, output)?;
        }
        Ok(())
    }
}
