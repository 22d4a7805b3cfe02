//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// A bounded-memory k-mer frequency counter for FASTQ and plain-text reads.
#[derive(Parser, Debug)]
#[command(name = "kmerfreq")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Path to the input file (.fastq/.fq or plain text, one read per line)
    pub path: PathBuf,

    /// K-mer length
    #[arg(value_parser = parse_k)]
    pub k: usize,

    /// Number of most frequent k-mers to report
    #[arg(value_parser = parse_top_count)]
    pub top_count: usize,

    /// Path of the SQLite database used for spilled counts
    #[arg(long, default_value = "kmer_count.db")]
    pub database_path: PathBuf,

    /// Expected number of distinct k-mers, used to size the Bloom filter
    #[arg(long, default_value_t = 10_000_000)]
    pub bloom_expected_items: u64,

    /// Desired Bloom filter false-positive rate, in (0, 1]
    #[arg(long, default_value_t = 0.01)]
    pub false_positive_rate: f64,

    /// Disable the Bloom filter and count every occurrence (naive mode)
    #[arg(long)]
    pub no_filter: bool,

    /// Delete the database file after printing results
    #[arg(long)]
    pub remove_database: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    pub format: OutputFormat,

    /// Suppress informational output (only print k-mer counts)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the top-K report.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Tab-separated values (kmer\tcount)
    #[default]
    Tsv,
    /// JSON array format
    Json,
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k == 0 {
        return Err("k-mer length must be at least 1".to_string());
    }
    Ok(k)
}

fn parse_top_count(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if n == 0 {
        return Err("top count must be at least 1".to_string());
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_k_rejects_zero_and_garbage() {
        assert!(parse_k("0").is_err());
        assert!(parse_k("abc").is_err());
        assert_eq!(parse_k("21"), Ok(21));
    }

    #[test]
    fn parse_top_count_rejects_zero() {
        assert!(parse_top_count("0").is_err());
        assert_eq!(parse_top_count("25"), Ok(25));
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::parse_from(["kmerfreq", "reads.fastq", "21", "25"]);
        assert_eq!(args.k, 21);
        assert_eq!(args.top_count, 25);
        assert_eq!(args.database_path, PathBuf::from("kmer_count.db"));
        assert_eq!(args.bloom_expected_items, 10_000_000);
        assert!((args.false_positive_rate - 0.01).abs() < f64::EPSILON);
        assert!(!args.no_filter);
    }
}
