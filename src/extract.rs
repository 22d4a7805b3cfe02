//! Sequence window extraction.
//!
//! [`WindowIter`] turns a read file into a lazy, finite, forward-only stream
//! of fixed-length windows. Record framing is delegated to
//! [`bio::io::fastq`] for FASTQ files; plain-text inputs are treated as one
//! sequence per line. The iterator is an explicit state machine
//! (`Idle` / `InRecord` / `EndOfInput`) so record boundaries never depend on
//! look-ahead heuristics.
//!
//! Windows are `Bytes` slices into the current record, so extraction does
//! not copy per window.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use bio::io::fastq;
use bytes::Bytes;

use crate::error::KmerFreqError;

/// Input format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Four-line FASTQ records; the sequence line is extracted per record.
    Fastq,
    /// Plain text, one sequence per line. Blank lines are skipped.
    Text,
}

impl SourceFormat {
    /// Detects the format from a file path's extension.
    ///
    /// `.fq` and `.fastq` select FASTQ; anything else is read as plain text,
    /// matching the tool's `.txt`-or-`.fastq` input contract.
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("fq" | "fastq") => Self::Fastq,
            _ => Self::Text,
        }
    }
}

#[derive(Debug)]
enum RecordSource {
    Fastq(fastq::Records<BufReader<File>>),
    Text(Lines<BufReader<File>>),
}

#[derive(Debug)]
enum ExtractState {
    /// Between records; the next window requires pulling a record.
    Idle,
    /// Emitting windows from the current record's sequence.
    InRecord { seq: Bytes, offset: usize },
    /// The source is exhausted (or failed); nothing further is emitted.
    EndOfInput,
}

/// Iterator of k-length sequence windows over a read file.
///
/// Yields windows in file order. Records shorter than `k` contribute no
/// windows. Any read or parse failure is yielded once and ends the stream;
/// the pipeline treats it as fatal.
#[derive(Debug)]
pub struct WindowIter {
    source: RecordSource,
    state: ExtractState,
    k: usize,
}

impl WindowIter {
    /// Opens `path` and prepares window extraction with length `k`, using
    /// the format detected from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`KmerFreqError::SourceRead`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, k: usize) -> Result<Self, KmerFreqError> {
        let path = path.as_ref();
        let source = match SourceFormat::from_extension(path) {
            SourceFormat::Fastq => {
                let reader = fastq::Reader::from_file(path).map_err(|e| {
                    KmerFreqError::SourceRead {
                        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
                        path: path.to_path_buf(),
                    }
                })?;
                RecordSource::Fastq(reader.records())
            }
            SourceFormat::Text => {
                let file = File::open(path).map_err(|source| KmerFreqError::SourceRead {
                    source,
                    path: path.to_path_buf(),
                })?;
                RecordSource::Text(BufReader::new(file).lines())
            }
        };

        Ok(Self {
            source,
            state: ExtractState::Idle,
            k,
        })
    }

    /// Pulls the next non-empty sequence from the source, or `None` at end
    /// of input.
    fn next_sequence(&mut self) -> Result<Option<Bytes>, KmerFreqError> {
        match &mut self.source {
            RecordSource::Fastq(records) => match records.next() {
                None => Ok(None),
                Some(Ok(record)) => Ok(Some(Bytes::copy_from_slice(record.seq()))),
                Some(Err(e)) => Err(KmerFreqError::SequenceParse {
                    details: e.to_string(),
                }),
            },
            RecordSource::Text(lines) => loop {
                match lines.next() {
                    None => return Ok(None),
                    Some(Ok(line)) => {
                        let trimmed = line.trim();
                        if !trimmed.is_empty() {
                            return Ok(Some(Bytes::copy_from_slice(trimmed.as_bytes())));
                        }
                    }
                    Some(Err(e)) => {
                        return Err(KmerFreqError::SequenceParse {
                            details: e.to_string(),
                        })
                    }
                }
            },
        }
    }
}

impl Iterator for WindowIter {
    type Item = Result<Bytes, KmerFreqError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                ExtractState::EndOfInput => return None,
                ExtractState::InRecord { seq, offset } if *offset + self.k <= seq.len() => {
                    let window = seq.slice(*offset..*offset + self.k);
                    *offset += 1;
                    return Some(Ok(window));
                }
                // Idle, or the current record is exhausted.
                _ => {}
            }

            match self.next_sequence() {
                Ok(Some(seq)) => self.state = ExtractState::InRecord { seq, offset: 0 },
                Ok(None) => {
                    self.state = ExtractState::EndOfInput;
                    return None;
                }
                Err(e) => {
                    self.state = ExtractState::EndOfInput;
                    return Some(Err(e));
                }
            }
        }
    }
}
