// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Batch accumulation.
//!
//! [`BatchAccumulator`] buffers items in arrival order until the configured
//! batch size is reached. A [`Batch`] is never empty: `drain_if_ready` only
//! returns full batches, and `force_flush` returns `None` on an empty buffer.
//!
//! ```text
//! offer ─► [ r1 r2 … rB ] ─► Ready ─► drain_if_ready ─► Batch(B)
//!                 end of input ─► force_flush ─► Batch(remaining) | None
//! ```

use std::num::NonZeroUsize;

/// Outcome of [`BatchAccumulator::offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The buffer holds a full batch; drain it before offering more.
    Ready,
    /// More items are needed.
    Pending,
}

/// A non-empty, ordered group of items taken from the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    items: Vec<T>,
}

impl<T> Batch<T> {
    /// Wraps a vector as a batch; `None` if it is empty.
    pub fn from_vec(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self { items })
        }
    }

    /// Number of items (always at least one).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false` for a batch.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in arrival order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the batch.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<A, B> Batch<(A, B)> {
    /// Splits a batch of pairs into two aligned batches.
    pub fn unzip(self) -> (Batch<A>, Batch<B>) {
        let (left, right) = self.items.into_iter().unzip();
        (Batch { items: left }, Batch { items: right })
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Ordered buffer that groups items into batches of a fixed upper size.
#[derive(Debug)]
pub struct BatchAccumulator<T> {
    batch_size: NonZeroUsize,
    buffer: Vec<T>,
}

impl<T> BatchAccumulator<T> {
    /// Creates an accumulator emitting batches of `batch_size` items.
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            buffer: Vec::with_capacity(batch_size.get()),
        }
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Number of buffered items.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Appends an item; reports `Ready` once the buffer reaches batch size.
    pub fn offer(&mut self, item: T) -> BatchStatus {
        self.buffer.push(item);
        if self.is_ready() {
            BatchStatus::Ready
        } else {
            BatchStatus::Pending
        }
    }

    /// Returns `true` if a full batch is buffered.
    pub fn is_ready(&self) -> bool {
        self.buffer.len() >= self.batch_size.get()
    }

    /// Takes the buffered batch if it is full.
    pub fn drain_if_ready(&mut self) -> Option<Batch<T>> {
        if self.is_ready() {
            Some(self.take())
        } else {
            None
        }
    }

    /// Takes whatever is buffered, full or not. Used once at end of input.
    pub fn force_flush(&mut self) -> Option<Batch<T>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    fn take(&mut self) -> Batch<T> {
        let items = std::mem::replace(
            &mut self.buffer,
            Vec::with_capacity(self.batch_size.get()),
        );
        Batch { items }
    }
}
