// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Output sink: one write per record, to a file or echoed to the console.
//!
//! The destination is fixed when the sink is built. File mode writes the
//! formatted line as-is; console mode prints the original record and the
//! prediction, labelled. Exactly one of the two happens per record.

use crate::reader::RawLine;
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

/// Where formatted predictions go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Append output lines to a file.
    File,
    /// Echo input and prediction to the console.
    Console,
}

/// Writes prediction lines to the configured destination.
///
/// Buffered file output is flushed by [`OutputSink::finish`], or on drop if
/// the run ends early.
pub struct OutputSink<W: Write> {
    destination: Destination,
    writer: W,
    written: usize,
}

impl OutputSink<BufWriter<File>> {
    /// Creates (truncating) `path` and writes predictions to it.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(Destination::File, BufWriter::new(file)))
    }
}

impl OutputSink<Stdout> {
    /// Echoes records and predictions to standard output.
    pub fn console() -> Self {
        Self::new(Destination::Console, io::stdout())
    }
}

impl<W: Write> OutputSink<W> {
    /// Wraps an arbitrary writer.
    pub fn new(destination: Destination, writer: W) -> Self {
        Self {
            destination,
            writer,
            written: 0,
        }
    }

    /// The fixed destination of this sink.
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Number of records emitted.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Emits one record's output line.
    ///
    /// `output` is written verbatim; it is expected to carry its own line
    /// terminator.
    pub fn emit(&mut self, raw: &RawLine, output: &str) -> io::Result<()> {
        match self.destination {
            Destination::File => self.writer.write_all(output.as_bytes())?,
            Destination::Console => {
                writeln!(self.writer, "input: {raw}")?;
                write!(self.writer, "prediction: {output}")?;
                if !output.ends_with('\n') {
                    writeln!(self.writer)?;
                }
            }
        }
        self.written += 1;
        Ok(())
    }

    /// Flushes pending output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
