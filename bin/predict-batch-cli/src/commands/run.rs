// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `predict-batch` run: resolve the model, stream the input, emit predictions.
//!
//! ```text
//! PredictionEngine<Idle> → resolve → <Ready> → run
//! ```

use anyhow::Context;
use batch_runtime::{
    ArchiveArtifactLoader, OutputSink, PredictionEngine, Ready, RecordReader, RunConfig,
    RunMetrics,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};

pub fn execute(config: RunConfig) -> anyhow::Result<()> {
    // Input must exist before the model is loaded.
    let input = File::open(&config.input_file)
        .with_context(|| format!("cannot open input file {}", config.input_file.display()))?;

    let loader = ArchiveArtifactLoader::new().with_weights_file(config.weights_file.clone());
    let engine = PredictionEngine::new(config)
        .resolve(&loader)
        .context("failed to load predictor")?;

    tracing::info!(
        task = %engine.task(),
        predictor = engine.service().name(),
        batch_size = engine.config().batch_size,
        device = %engine.config().device(),
        "predictor ready"
    );

    let reader = RecordReader::new(BufReader::new(input));
    let metrics = match engine.config().output_file.clone() {
        Some(path) => {
            let sink = OutputSink::file(&path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            drive(&engine, reader, sink)?
        }
        None => drive(&engine, reader, OutputSink::console())?,
    };

    tracing::info!(records = metrics.records, "done");
    Ok(())
}

/// Runs the engine and releases the sink whether or not the run succeeded.
fn drive<R: BufRead, W: Write>(
    engine: &PredictionEngine<Ready>,
    reader: RecordReader<R>,
    mut sink: OutputSink<W>,
) -> anyhow::Result<RunMetrics> {
    let result = engine.run(reader, &mut sink);
    let written = sink.written();
    let finished = sink.finish();

    let metrics = result.with_context(|| format!("run aborted after {written} records"))?;
    finished.context("failed to flush output")?;
    Ok(metrics)
}
