// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare batch sizes on the synthetic predictors.
//!
//! Runs the same input through both tasks at several batch sizes and shows
//! how the calls split between the single-item and batch conventions.
//!
//! ```bash
//! cargo run -p batch-runtime --example batch_size_comparison
//! ```

use batch_runtime::{
    Destination, OutputSink, PredictionEngine, RecordReader, RunConfig, SyntheticPredictor,
    TaskVariant,
};
use std::io::Cursor;

const INPUT: &str = "\
The keys, which were needed to access the building, were locked in the car.

However, they were not required for the tour.
Paul asked Mary where she had left them.
She said she gave them to him yesterday.

He could not remember.
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .init();

    println!(
        "{:<16} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "Task", "Batch", "Records", "Batches", "Single", "Multi",
    );
    println!("{}", "-".repeat(60));

    for task in TaskVariant::ALL {
        for batch_size in [1, 2, 3, 8] {
            let config = RunConfig {
                batch_size,
                ..RunConfig::default()
            };
            let engine = PredictionEngine::from_service(
                config,
                task,
                Box::new(SyntheticPredictor::new(task)),
            )?;

            let mut sink = OutputSink::new(Destination::File, Vec::new());
            let metrics = engine.run(RecordReader::new(Cursor::new(INPUT)), &mut sink)?;

            println!(
                "{:<16} {:>6} {:>8} {:>8} {:>8} {:>8}",
                task.as_str(),
                batch_size,
                metrics.records,
                metrics.batches,
                metrics.single_calls,
                metrics.batch_calls,
            );
        }
    }

    // One formatted line, as it would land in an output file.
    let task = TaskVariant::RoleLabeling;
    let engine = PredictionEngine::from_service(
        RunConfig::default(),
        task,
        Box::new(SyntheticPredictor::new(task)),
    )?;
    let mut sink = OutputSink::new(Destination::File, Vec::new());
    engine.run(RecordReader::new(Cursor::new("Paul asked Mary.\n")), &mut sink)?;
    print!("\n{}", String::from_utf8(sink.finish()?)?);

    Ok(())
}
