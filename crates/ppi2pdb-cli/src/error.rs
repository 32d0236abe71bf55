//! Error types for the ppi2pdb CLI
//!
//! User-facing errors with clear, actionable messages. Anything that reaches
//! `main` is fatal and ends the run with exit status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// A remote service answered with an unexpected body
    #[error("API error: {0}")]
    Api(String),

    /// A remote service answered with a non-success status
    #[error("Request to '{url}' failed with status {status}")]
    Status { url: String, status: u16 },

    /// Input file could not be read or parsed
    #[error(transparent)]
    Ingest(#[from] ppi2pdb_ingest::IngestError),

    /// Domain validation failed
    #[error(transparent)]
    Domain(#[from] ppi2pdb_common::Ppi2PdbError),

    /// Prediction folder expected on disk is missing
    #[error("Required folder not found: '{}'. Check the --af-folder location and the layout of the downloaded prediction tree.", .0.display())]
    FolderMissing(PathBuf),

    /// Prediction folder destination is already populated
    #[error("Output folder already exists: '{}'. Remove it and try again.", .0.display())]
    FolderExists(PathBuf),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your command-line flags and environment variables.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Output table could not be written
    #[error("Failed to write table: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and the API URLs.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Directory walk failed while copying a prediction folder
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn folder_missing(path: impl Into<PathBuf>) -> Self {
        Self::FolderMissing(path.into())
    }

    pub fn folder_exists(path: impl Into<PathBuf>) -> Self {
        Self::FolderExists(path.into())
    }

    /// Whether the failure may clear up on a retry: transport errors and
    /// server-side statuses
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_decode() && e.status().map_or(true, |s| s.is_server_error()),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_errors_name_the_path() {
        let err = CliError::folder_missing("/data/HuMAP_dimers/pdb/P1-P2");
        assert!(err.to_string().contains("/data/HuMAP_dimers/pdb/P1-P2"));

        let err = CliError::folder_exists("out/Huri_dimers/P1-P2");
        assert!(err.to_string().contains("Remove it"));
    }

    #[test]
    fn test_only_http_errors_are_transient() {
        assert!(!CliError::api("bad body").is_transient());
        assert!(!CliError::config("missing flag").is_transient());

        let server = CliError::Status { url: "http://x".into(), status: 503 };
        assert!(server.is_transient());
        let client = CliError::Status { url: "http://x".into(), status: 404 };
        assert!(!client.is_transient());
    }
}
