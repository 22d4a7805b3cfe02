//! Streaming counting pipeline.
//!
//! Single-threaded by design: each k-mer is processed to completion (filter
//! check, optional increment, optional flush) before the next window is
//! read, so first-occurrence suppression follows file order exactly.
//!
//! Per k-mer:
//! 1. if a membership filter is configured and has not seen the k-mer,
//!    remember it and suppress it (the first occurrence is never counted);
//! 2. otherwise increment it in the bounded counting table;
//! 3. when the table reaches capacity, drain it and merge into the store.
//!
//! After the stream ends a final flush always runs, even if the table never
//! reached capacity, and the top-K query is answered from the store. With no
//! filter configured the same pipeline is the naive bounded-dict counter.

use bytes::Bytes;
use tracing::{debug, info};

use crate::bloom::BloomFilter;
use crate::error::KmerFreqError;
use crate::store::CountStore;
use crate::table::CountTable;

/// Maximum number of distinct k-mers held in memory before a flush.
///
/// Entry count, not bytes: per-entry cost is treated as uniform for sizing.
/// A tuning knob for operators, not a CLI flag.
pub const TABLE_CAPACITY: usize = 25_000_000;

/// Bounded-memory k-mer counting pipeline over an injected [`CountStore`].
pub struct Pipeline<S> {
    filter: Option<BloomFilter>,
    table: CountTable,
    store: S,
    capacity: usize,
    flushes: u64,
}

impl<S: CountStore> Pipeline<S> {
    /// Creates a pipeline with the default table capacity.
    ///
    /// With `filter` set to `None` every occurrence is counted (the naive
    /// variant); otherwise first occurrences are suppressed.
    pub fn new(store: S, filter: Option<BloomFilter>) -> Self {
        Self::with_capacity(store, filter, TABLE_CAPACITY)
    }

    /// Creates a pipeline with an explicit table capacity. Intended for
    /// tests that need to force flushes with small inputs.
    pub fn with_capacity(store: S, filter: Option<BloomFilter>, capacity: usize) -> Self {
        Self {
            filter,
            table: CountTable::new(),
            store,
            capacity: capacity.max(1),
            flushes: 0,
        }
    }

    /// Feeds one k-mer through the filter/count/flush state machine.
    ///
    /// # Errors
    ///
    /// Returns [`KmerFreqError::StorageUnavailable`] if a capacity flush
    /// fails; the run must abort, since drained counts would otherwise be
    /// lost.
    pub fn observe(&mut self, kmer: Bytes) -> Result<(), KmerFreqError> {
        if let Some(filter) = &mut self.filter {
            if !filter.lookup(&kmer) {
                filter.add(&kmer);
                return Ok(());
            }
        }

        self.table.increment(kmer);
        if self.table.len() >= self.capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Consumes an extractor stream, observing every window in order.
    ///
    /// Extraction errors are fatal and propagate immediately.
    pub fn consume<I>(&mut self, windows: I) -> Result<(), KmerFreqError>
    where
        I: IntoIterator<Item = Result<Bytes, KmerFreqError>>,
    {
        for window in windows {
            self.observe(window?)?;
        }
        Ok(())
    }

    /// Performs the unconditional final flush and answers the top-`n` query
    /// from the store.
    pub fn finish(&mut self, n: usize) -> Result<Vec<(String, u64)>, KmerFreqError> {
        self.flush()?;
        info!(flushes = self.flushes, "stream complete, querying top counts");
        self.store.top(n)
    }

    /// Number of merges performed so far, including the final flush.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn flush(&mut self) -> Result<(), KmerFreqError> {
        let batch = self.table.drain();
        debug!(entries = batch.len(), "flushing counting table");
        self.store.merge(batch)?;
        self.flushes += 1;
        Ok(())
    }
}
