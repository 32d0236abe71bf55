//! Error types shared across ppi2pdb crates

use thiserror::Error;

/// Result type alias for shared ppi2pdb operations
pub type Result<T> = std::result::Result<T, Ppi2PdbError>;

/// Main error type for shared domain operations
#[derive(Error, Debug)]
pub enum Ppi2PdbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid structure identifier: '{0}' (expected a 4-character code starting with a digit, e.g. 1YCR)")]
    InvalidStructureId(String),

    #[error("Invalid score: '{0}'")]
    InvalidScore(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
