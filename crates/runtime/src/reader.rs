// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Record reader: non-blank lines of a text stream, in arrival order.

use std::io::{self, BufRead, Seek, SeekFrom};

/// One non-blank input record, surrounding whitespace stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number in the source stream.
    line_no: usize,
    text: String,
}

impl RawLine {
    /// Strips `line` and returns it as a record, or `None` if it is blank.
    pub fn parse(line: &str) -> Option<Self> {
        Self::at(0, line)
    }

    fn at(line_no: usize, line: &str) -> Option<Self> {
        let text = line.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self {
                line_no,
                text: text.to_string(),
            })
        }
    }

    /// The stripped record text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line number in the source stream (0 when built with [`RawLine::parse`]).
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl std::fmt::Display for RawLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lazily yields the non-blank lines of a buffered reader.
///
/// Blank and whitespace-only lines are skipped and never reach the batcher.
/// Invalid UTF-8 surfaces as an [`io::ErrorKind::InvalidData`] error.
pub struct RecordReader<R> {
    inner: R,
    buf: String,
    line_no: usize,
    skipped: usize,
}

impl<R: BufRead> RecordReader<R> {
    /// Wraps a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Number of blank lines skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

}

impl<R: BufRead + Seek> RecordReader<R> {
    /// Restarts the sequence from the first line of the stream.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.line_no = 0;
        self.skipped = 0;
        Ok(())
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = io::Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    match RawLine::at(self.line_no, &self.buf) {
                        Some(line) => return Some(Ok(line)),
                        None => self.skipped += 1,
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
