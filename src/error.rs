//! Error types for kmerfreq.
//!
//! Every failure in a run is fatal: the design has no retry path, so errors
//! carry enough context to diagnose the run and nothing else.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in kmerfreq operations.
#[derive(Debug, Error)]
pub enum KmerFreqError {
    /// A start-up parameter is malformed (k, top count, filter sizing).
    #[error("invalid parameter {name}: {details}")]
    InvalidParameter {
        /// Which parameter was rejected.
        name: &'static str,
        details: String,
    },

    /// The persistent store cannot be opened, read, or written.
    ///
    /// A merge failure aborts the whole run rather than risking silently
    /// lost counts.
    #[error("storage unavailable: {source}")]
    StorageUnavailable {
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to read the input sequence file.
    #[error("failed to read sequence file '{path}': {source}")]
    SourceRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to parse a sequence record mid-stream.
    #[error("failed to parse sequence record: {details}")]
    SequenceParse { details: String },

    /// Failed to write results.
    #[error("failed to write output: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

impl KmerFreqError {
    /// Shorthand for an [`InvalidParameter`](Self::InvalidParameter) error.
    pub fn invalid_parameter(name: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            details: details.into(),
        }
    }
}

impl From<rusqlite::Error> for KmerFreqError {
    fn from(source: rusqlite::Error) -> Self {
        Self::StorageUnavailable { source }
    }
}

impl From<serde_json::Error> for KmerFreqError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let err = KmerFreqError::invalid_parameter("k", "must be at least 1");
        assert_eq!(err.to_string(), "invalid parameter k: must be at least 1");
    }

    #[test]
    fn sequence_parse_display() {
        let err = KmerFreqError::SequenceParse {
            details: "truncated record".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse sequence record: truncated record"
        );
    }

    #[test]
    fn storage_error_from_rusqlite() {
        let err: KmerFreqError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, KmerFreqError::StorageUnavailable { .. }));
    }
}
