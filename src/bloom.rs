//! Bloom filter used as a singleton suppressor.
//!
//! The filter remembers every k-mer it has been shown and never counts the
//! first occurrence: a k-mer only reaches the counting table once the filter
//! has already seen it. K-mers that truly occur once are therefore invisible
//! to the rest of the pipeline, which is what bounds memory on read data
//! dominated by sequencing-error singletons. The cost is that every reported
//! count is lower than the true occurrence count by exactly one.
//!
//! No false negatives: once added, `lookup` always returns true. False
//! positives happen at roughly the configured rate and cause a first
//! occurrence to be counted as if it were a repeat.

use std::hash::{Hash, Hasher};

use ahash::AHasher;

use crate::error::KmerFreqError;

/// A space-efficient probabilistic membership filter over byte-string keys.
pub struct BloomFilter {
    /// Bit vector storing the filter state.
    bits: Vec<u64>,
    /// Number of bits in the filter.
    num_bits: usize,
    /// Number of hash rounds per key.
    num_hashes: usize,
    /// Seed mixed into the base hash.
    seed: u64,
}

impl BloomFilter {
    /// Computes the bit-vector size `m` and hash-round count `h` for a
    /// filter expected to hold `expected_items` keys at the given false
    /// positive rate.
    ///
    /// Uses the standard sizing formulas `m = -n * ln(p) / ln(2)^2` and
    /// `h = (m / n) * ln(2)`, both rounded up.
    ///
    /// # Errors
    ///
    /// Returns [`KmerFreqError::InvalidParameter`] if `expected_items` is
    /// zero or `fp_rate` is outside `(0, 1]`.
    pub fn size_for(expected_items: u64, fp_rate: f64) -> Result<(usize, usize), KmerFreqError> {
        if expected_items == 0 {
            return Err(KmerFreqError::invalid_parameter(
                "bloom_expected_items",
                "must be greater than zero",
            ));
        }
        if !(fp_rate > 0.0 && fp_rate <= 1.0) {
            return Err(KmerFreqError::invalid_parameter(
                "false_positive_rate",
                format!("{fp_rate} is not in (0, 1]"),
            ));
        }

        let n = expected_items as f64;
        let ln2_sq = std::f64::consts::LN_2 * std::f64::consts::LN_2;
        let num_bits = (-n * fp_rate.ln() / ln2_sq).ceil() as usize;
        let num_hashes = ((num_bits as f64 / n) * std::f64::consts::LN_2).ceil() as usize;

        Ok((num_bits, num_hashes))
    }

    /// Creates a filter sized via [`size_for`](Self::size_for).
    pub fn with_rate(expected_items: u64, fp_rate: f64) -> Result<Self, KmerFreqError> {
        let (num_bits, num_hashes) = Self::size_for(expected_items, fp_rate)?;
        Ok(Self::new(num_bits, num_hashes))
    }

    /// Creates a filter with explicit size parameters.
    ///
    /// The bit count is rounded up to a whole number of 64-bit words and at
    /// least one hash round is always used.
    pub fn new(num_bits: usize, num_hashes: usize) -> Self {
        let num_bits = num_bits.div_ceil(64).max(1) * 64;
        Self {
            bits: vec![0u64; num_bits / 64],
            num_bits,
            num_hashes: num_hashes.max(1),
            seed: 0x517c_c1b7_2722_0a95,
        }
    }

    /// Adds a key to the filter. Idempotent; bits are never cleared.
    #[inline]
    pub fn add(&mut self, item: &[u8]) {
        let hash = self.hash_item(item);
        for round in 0..self.num_hashes {
            let bit = self.bit_index(hash, round);
            self.bits[bit / 64] |= 1u64 << (bit % 64);
        }
    }

    /// Returns false if the key was definitely never added, true if it was
    /// added or collides with previously added keys.
    #[inline]
    pub fn lookup(&self, item: &[u8]) -> bool {
        let hash = self.hash_item(item);
        (0..self.num_hashes).all(|round| {
            let bit = self.bit_index(hash, round);
            self.bits[bit / 64] & (1u64 << (bit % 64)) != 0
        })
    }

    /// Number of bits in the filter.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Number of hash rounds per key.
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Memory held by the bit vector, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.bits.len() * 8
    }

    /// Derives the bit index for hash round `round` by double hashing:
    /// `h(i) = h1 + i * h2 mod m`.
    #[inline]
    fn bit_index(&self, hash: u64, round: usize) -> usize {
        let h1 = hash as u32 as u64;
        let h2 = (hash >> 32) as u32 as u64;
        let combined = h1.wrapping_add((round as u64).wrapping_mul(h2));
        (combined % self.num_bits as u64) as usize
    }

    #[inline]
    fn hash_item(&self, item: &[u8]) -> u64 {
        let mut hasher = AHasher::default();
        item.hash(&mut hasher);
        hasher.finish() ^ self.seed
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.num_bits)
            .field("num_hashes", &self.num_hashes)
            .finish_non_exhaustive()
    }
}
