//! Validated run configuration.
//!
//! All parameter validation happens here, before any input is read, so a
//! malformed invocation aborts without touching the database.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::cli::{Args, OutputFormat};
use crate::error::KmerFreqError;

/// Parameters for one counting run.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub k: usize,
    pub top_count: usize,
    pub database_path: PathBuf,
    /// Bloom filter sizing, or `None` for the naive (unfiltered) variant.
    pub filter: Option<FilterConfig>,
    pub remove_database: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Bloom filter sizing parameters.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    pub expected_items: u64,
    pub false_positive_rate: f64,
}

impl Config {
    /// Validates CLI arguments into a run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KmerFreqError::InvalidParameter`] for a zero k or top
    /// count, a false-positive rate outside `(0, 1]`, or zero expected
    /// items, and [`KmerFreqError::SourceRead`] if the input path does not
    /// exist.
    pub fn from_args(args: Args) -> Result<Self, KmerFreqError> {
        if args.k == 0 {
            return Err(KmerFreqError::invalid_parameter(
                "k",
                "must be at least 1",
            ));
        }
        if args.top_count == 0 {
            return Err(KmerFreqError::invalid_parameter(
                "top_count",
                "must be at least 1",
            ));
        }

        let filter = if args.no_filter {
            None
        } else {
            let rate = args.false_positive_rate;
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(KmerFreqError::invalid_parameter(
                    "false_positive_rate",
                    format!("{rate} is not in (0, 1]"),
                ));
            }
            if rate >= 1.0 {
                // A rate of 1 makes every lookup a hit, which disables
                // singleton suppression entirely.
                warn!(rate, "false-positive rate of 1 degenerates the filter to always-seen");
            }
            if args.bloom_expected_items == 0 {
                return Err(KmerFreqError::invalid_parameter(
                    "bloom_expected_items",
                    "must be greater than zero",
                ));
            }
            Some(FilterConfig {
                expected_items: args.bloom_expected_items,
                false_positive_rate: rate,
            })
        };

        fs::metadata(&args.path).map_err(|source| KmerFreqError::SourceRead {
            source,
            path: args.path.clone(),
        })?;

        Ok(Self {
            path: args.path,
            k: args.k,
            top_count: args.top_count,
            database_path: args.database_path,
            filter,
            remove_database: args.remove_database,
            format: args.format,
            quiet: args.quiet,
        })
    }
}
