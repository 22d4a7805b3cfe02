//! Persistent merge store for spilled k-mer counts.
//!
//! The store is a durable `kmer -> count` table with one non-trivial
//! operation: [`CountStore::merge`], which folds a drained in-memory batch
//! into whatever storage already holds. The merge is deliberately lossy in
//! two ways, both inherited from the sizing model rather than accidents:
//!
//! 1. Only the top [`MERGE_READBACK_ROWS`] stored entries (by descending
//!    count) are read back and summed into the batch; everything else is
//!    dropped when the table is rewritten.
//! 2. Entries whose summed count is 1 are not written back, so k-mers that
//!    never repeat within a merge generation are shed instead of growing
//!    storage without bound.
//!
//! The whole merge runs inside a single transaction, so a crash mid-merge
//! leaves the previous generation intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::KmerFreqError;
use crate::table::CountBatch;

/// Maximum number of stored rows read back into a merge, ordered by
/// descending count. Rows beyond this limit are dropped by the rewrite.
///
/// A tuning knob for operators, not a CLI flag.
pub const MERGE_READBACK_ROWS: usize = 600_000;

/// A durable k-mer count table supporting merge-on-spill.
///
/// Implementations are exclusively owned by one pipeline for the duration of
/// a run; nothing else may write to the underlying storage concurrently.
pub trait CountStore {
    /// Folds `batch` into storage: existing entries (up to the read-back
    /// limit) are summed into the batch, storage is cleared, and entries
    /// with a summed count strictly greater than 1 are written back.
    fn merge(&mut self, batch: CountBatch) -> Result<(), KmerFreqError>;

    /// Returns up to `n` entries ordered by descending count. Ties are
    /// broken by ascending k-mer so results are deterministic.
    fn top(&self, n: usize) -> Result<Vec<(String, u64)>, KmerFreqError>;

    /// Deletes all stored entries.
    fn clear(&mut self) -> Result<(), KmerFreqError>;
}

/// SQLite-backed [`CountStore`].
///
/// Schema: `kmers (kmer TEXT PRIMARY KEY NOT NULL, count INTEGER NOT NULL)`.
/// This schema is the on-disk contract; substitute backends must preserve it.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
    readback_rows: usize,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the `kmers`
    /// table exists.
    ///
    /// # Errors
    ///
    /// Returns [`KmerFreqError::StorageUnavailable`] if the file cannot be
    /// opened or the schema cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KmerFreqError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kmers (
                kmer TEXT PRIMARY KEY NOT NULL,
                count INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn,
            path: path.as_ref().to_path_buf(),
            readback_rows: MERGE_READBACK_ROWS,
        })
    }

    /// Overrides the merge read-back limit. Intended for tests that need to
    /// exercise truncation without six hundred thousand rows.
    pub fn with_readback_rows(mut self, rows: usize) -> Self {
        self.readback_rows = rows;
        self
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CountStore for SqliteStore {
    fn merge(&mut self, mut batch: CountBatch) -> Result<(), KmerFreqError> {
        let tx = self.conn.transaction()?;
        {
            let mut read = tx.prepare(
                "SELECT kmer, count FROM kmers ORDER BY count DESC, kmer ASC LIMIT ?1",
            )?;
            let rows = read.query_map(params![self.readback_rows as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (kmer, count) = row?;
                *batch.entry(Bytes::from(kmer)).or_insert(0) += count.max(0) as u64;
            }
        }

        tx.execute("DELETE FROM kmers", [])?;

        {
            // The table was just cleared, so this is a bulk insert; OR IGNORE
            // guards against duplicate keys within the batch itself.
            let mut write =
                tx.prepare("INSERT OR IGNORE INTO kmers (kmer, count) VALUES (?1, ?2)")?;
            let mut written = 0usize;
            for (kmer, count) in &batch {
                if *count > 1 {
                    write.execute(params![
                        String::from_utf8_lossy(kmer).as_ref(),
                        i64::try_from(*count).unwrap_or(i64::MAX)
                    ])?;
                    written += 1;
                }
            }
            debug!(batch = batch.len(), written, "merged batch into store");
        }
        tx.commit()?;
        Ok(())
    }

    fn top(&self, n: usize) -> Result<Vec<(String, u64)>, KmerFreqError> {
        let mut stmt = self
            .conn
            .prepare("SELECT kmer, count FROM kmers ORDER BY count DESC, kmer ASC LIMIT ?1")?;
        let rows = stmt.query_map(params![n as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (kmer, count) = row?;
            results.push((kmer, count.max(0) as u64));
        }
        Ok(results)
    }

    fn clear(&mut self) -> Result<(), KmerFreqError> {
        self.conn.execute("DELETE FROM kmers", [])?;
        Ok(())
    }
}

/// In-memory [`CountStore`] with the same merge semantics as
/// [`SqliteStore`], including read-back truncation and the `count > 1`
/// write-back filter.
///
/// Used as a test double and wherever durability is not needed. Tracks how
/// many times `merge` has been called so tests can verify flush behavior.
#[derive(Debug)]
pub struct MemoryStore {
    rows: HashMap<String, u64>,
    readback_rows: usize,
    merges: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store with the default read-back limit.
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            readback_rows: MERGE_READBACK_ROWS,
            merges: 0,
        }
    }

    /// Overrides the merge read-back limit.
    pub fn with_readback_rows(mut self, rows: usize) -> Self {
        self.readback_rows = rows;
        self
    }

    /// Number of times [`CountStore::merge`] has been called.
    pub fn merge_count(&self) -> u64 {
        self.merges
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl CountStore for MemoryStore {
    fn merge(&mut self, mut batch: CountBatch) -> Result<(), KmerFreqError> {
        self.merges += 1;

        let mut existing: Vec<(String, u64)> = self.rows.drain().collect();
        existing.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        existing.truncate(self.readback_rows);

        for (kmer, count) in existing {
            *batch.entry(Bytes::from(kmer)).or_insert(0) += count;
        }

        for (kmer, count) in batch {
            if count > 1 {
                self.rows
                    .insert(String::from_utf8_lossy(&kmer).into_owned(), count);
            }
        }
        Ok(())
    }

    fn top(&self, n: usize) -> Result<Vec<(String, u64)>, KmerFreqError> {
        let mut results: Vec<(String, u64)> =
            self.rows.iter().map(|(k, v)| (k.clone(), *v)).collect();
        results.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        results.truncate(n);
        Ok(results)
    }

    fn clear(&mut self) -> Result<(), KmerFreqError> {
        self.rows.clear();
        Ok(())
    }
}
