//! Bounded in-memory counting table.
//!
//! A pure accumulator: it never evicts and never enforces its own capacity.
//! The pipeline checks [`CountTable::len`] against the configured capacity
//! after each increment and drains the table into the persistent store when
//! the cap is reached.

use std::hash::BuildHasherDefault;
use std::mem;

use bytes::Bytes;
use rustc_hash::FxHasher;

/// A batch of k-mer counts, keyed by the raw k-mer bytes.
///
/// Uses `FxHasher` for fast hashing of short keys.
pub type CountBatch = std::collections::HashMap<Bytes, u64, BuildHasherDefault<FxHasher>>;

/// In-memory k-mer count accumulator.
#[derive(Debug, Default)]
pub struct CountTable {
    counts: CountBatch,
}

impl CountTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for `kmer`, inserting it at 1 if absent.
    #[inline]
    pub fn increment(&mut self, kmer: Bytes) {
        *self.counts.entry(kmer).or_insert(0) += 1;
    }

    /// Number of distinct k-mers currently held.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no k-mers are held.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the accumulated counts and resets the table to empty.
    pub fn drain(&mut self) -> CountBatch {
        mem::take(&mut self.counts)
    }
}
