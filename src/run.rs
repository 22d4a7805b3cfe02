//! Run wiring and result output.
//!
//! Builds the filter, pipeline, store, and extractor from a validated
//! [`Config`], streams the input to completion, and prints the top-K report.

use std::fs;
use std::io::{stdout, BufWriter, Write};

use serde::Serialize;
use tracing::info;

use crate::bloom::BloomFilter;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::KmerFreqError;
use crate::extract::WindowIter;
use crate::pipeline::Pipeline;
use crate::store::SqliteStore;

/// A k-mer with its count, used for JSON serialization.
#[derive(Serialize)]
struct KmerCount {
    kmer: String,
    count: u64,
}

/// Executes one counting run end to end.
///
/// # Errors
///
/// Any extraction, storage, or output failure aborts the run; there is no
/// retry path.
pub fn run(config: Config) -> Result<(), KmerFreqError> {
    let store = SqliteStore::open(&config.database_path)?;

    let filter = match config.filter {
        Some(sizing) => {
            let filter = BloomFilter::with_rate(sizing.expected_items, sizing.false_positive_rate)?;
            info!(
                bits = filter.num_bits(),
                hashes = filter.num_hashes(),
                "sized membership filter"
            );
            Some(filter)
        }
        None => None,
    };

    let mut pipeline = Pipeline::new(store, filter);
    let windows = WindowIter::open(&config.path, config.k)?;
    pipeline.consume(windows)?;

    let top = pipeline.finish(config.top_count)?;
    info!(
        results = top.len(),
        flushes = pipeline.flush_count(),
        "run complete"
    );

    output_counts(&top, config.format)?;
    if !config.quiet {
        println!();
        println!("Results are saved to: {}", config.database_path.display());
    }

    if config.remove_database {
        fs::remove_file(&config.database_path)
            .map_err(|source| KmerFreqError::Write { source })?;
    }

    Ok(())
}

fn output_counts(counts: &[(String, u64)], format: OutputFormat) -> Result<(), KmerFreqError> {
    let mut buf = BufWriter::new(stdout());

    match format {
        OutputFormat::Tsv => {
            for (kmer, count) in counts {
                writeln!(buf, "{kmer}\t{count}").map_err(|source| KmerFreqError::Write { source })?;
            }
        }
        OutputFormat::Json => {
            let json_data: Vec<KmerCount> = counts
                .iter()
                .map(|(kmer, count)| KmerCount {
                    kmer: kmer.clone(),
                    count: *count,
                })
                .collect();
            serde_json::to_writer_pretty(&mut buf, &json_data)?;
            writeln!(buf).map_err(|source| KmerFreqError::Write { source })?;
        }
    }

    buf.flush().map_err(|source| KmerFreqError::Write { source })
}
