//! Buffered write-through log over the pair store: mutations accumulate in
//! memory and are applied as one atomic transaction when the buffer reaches
//! its threshold. Callers must `flush` at end-of-stream — the final partial
//! batch is committed, not lost.

use crate::store::{Mutation, PairStore};
use anyhow::Result;

pub struct BatchWriter {
    pending: Vec<Mutation>,
    threshold: usize,
}

impl BatchWriter {
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            pending: Vec::with_capacity(threshold),
            threshold,
        }
    }

    /// Queue one mutation, committing the whole buffer once it reaches the
    /// threshold. Returns the number of statements a commit applied
    /// (0 when the write was only buffered).
    pub fn push(&mut self, store: &mut PairStore, m: Mutation) -> Result<usize> {
        self.pending.push(m);
        if self.pending.len() >= self.threshold {
            return self.flush(store);
        }
        Ok(0)
    }

    /// Commit whatever is buffered. Safe to call with an empty buffer.
    pub fn flush(&mut self, store: &mut PairStore) -> Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let applied = store.apply_batch(&self.pending)?;
        self.pending.clear();
        Ok(applied)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
