//! Error types for input readers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors raised while reading input files.
///
/// Every variant names the offending file so the message is actionable on
/// its own.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid score '{value}' in '{path}' at line {line}")]
    InvalidScore {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Invalid pair identifier '{value}' in '{path}' at line {line} (expected 'ID1-ID2')")]
    InvalidPair {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Cannot parse override config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("Invalid override entry '{entry}' in section [{section}] of '{path}': {reason}")]
    InvalidOverride {
        path: PathBuf,
        section: String,
        entry: String,
        reason: String,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
