//! # kmerfreq
//!
//! A bounded-memory k-mer frequency counter for large read files.
//!
//! Distinct k-mers in sequencing data routinely outnumber what fits in RAM,
//! and most of them are singletons. kmerfreq bounds memory three ways:
//!
//! - a [Bloom filter](bloom::BloomFilter) suppresses the first occurrence of
//!   every k-mer, so true one-offs never enter the counting table (reported
//!   counts are therefore one below the true occurrence count);
//! - the in-memory [counting table](table::CountTable) is capped at a fixed
//!   number of entries and spilled to storage when full;
//! - spilled batches are folded into a SQLite-backed
//!   [merge store](store::SqliteStore) that sums counts across generations
//!   and sheds entries that never repeat.
//!
//! The trade is deliberate: frequent-k-mer discovery with bounded memory,
//! not exact enumeration.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use kmerfreq::bloom::BloomFilter;
//! use kmerfreq::pipeline::Pipeline;
//! use kmerfreq::store::MemoryStore;
//!
//! let filter = BloomFilter::with_rate(1_000, 0.001)?;
//! let mut pipeline = Pipeline::new(MemoryStore::new(), Some(filter));
//!
//! let seq = Bytes::from_static(b"ACGTACGTACGT");
//! for i in 0..=seq.len() - 4 {
//!     pipeline.observe(seq.slice(i..i + 4))?;
//! }
//!
//! let top = pipeline.finish(10)?;
//! assert_eq!(top, vec![("ACGT".to_string(), 2)]);
//! # Ok::<(), kmerfreq::error::KmerFreqError>(())
//! ```

pub mod bloom;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod run;
pub mod store;
pub mod table;

pub use bloom::BloomFilter;
pub use error::KmerFreqError;
pub use pipeline::Pipeline;
pub use store::{CountStore, MemoryStore, SqliteStore};
pub use table::{CountBatch, CountTable};
