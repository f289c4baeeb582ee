// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # predict-batch
//!
//! Runs a role-labeling or coreference model over a text file, one record per
//! non-blank line, and writes one JSON prediction per record.
//!
//! ## Usage
//! ```bash
//! # Role labeling, predictions to a file, 16 sentences per call
//! predict-batch https://example.org/models/srl-model.tar.gz sentences.txt \
//!     --output-file sentences.srl.jsonl --batch-size 16
//!
//! # Coreference on GPU 0, echoed to the console
//! predict-batch ./models/coref-model documents.txt --cuda-device 0
//!
//! # Base settings from a TOML file, with extra logging
//! predict-batch ./models/srl sentences.txt --config run.toml -vv
//! ```

mod commands;

use batch_runtime::RunConfig;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "predict-batch",
    about = "Batch role-labeling and coreference predictions over newline-delimited text",
    version,
    author
)]
struct Cli {
    /// The archived model to make predictions with (directory, .tar.gz file or URL).
    archive_path: String,

    /// Path to the input file, one record per line.
    input_file: PathBuf,

    /// Path to the output file. Predictions are echoed to the console when omitted.
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Number of records per prediction call [default: 1].
    #[arg(long)]
    batch_size: Option<NonZeroUsize>,

    /// Id of the GPU to use; -1 runs on CPU [default: -1].
    #[arg(long, allow_negative_numbers = true)]
    cuda_device: Option<i32>,

    /// JSON object merged into the model configuration (e.g. '{"model.type": "srl"}').
    #[arg(long)]
    overrides: Option<String>,

    /// Weights file to use instead of the archive's default.
    #[arg(long)]
    weights_file: Option<PathBuf>,

    /// Path to a TOML file with base settings (command-line flags take precedence).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Merges the command line over the optional config file.
    fn into_run_config(self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        config.archive_path = self.archive_path;
        config.input_file = self.input_file;
        if let Some(output_file) = self.output_file {
            config.output_file = Some(output_file);
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size.get();
        }
        if let Some(cuda_device) = self.cuda_device {
            config.cuda_device = cuda_device;
        }
        if let Some(overrides) = self.overrides {
            config.overrides = overrides;
        }
        if let Some(weights_file) = self.weights_file {
            config.weights_file = Some(weights_file);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = cli.into_run_config()?;
    commands::run::execute(config)
}
