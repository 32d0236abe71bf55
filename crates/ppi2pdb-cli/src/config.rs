//! API configuration
//!
//! Base URLs, timeout and lookup pool settings. Defaults point at the public
//! services; every value can be overridden from the environment.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Defaults
// ============================================================================

/// Structure search service
pub const DEFAULT_RCSB_URL: &str = "https://search.rcsb.org";

/// Structure annotation service
pub const DEFAULT_PDBE_URL: &str = "https://www.ebi.ac.uk/pdbe";

/// Identifier-lookup service
pub const DEFAULT_UNIPROT_URL: &str = "https://rest.uniprot.org";

/// Default timeout for API requests in seconds.
/// Can be overridden via PPI2PDB_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// Concurrent identifier lookups and idle connections kept per host
pub const DEFAULT_POOL_SIZE: usize = 16;

pub const DEFAULT_LOOKUP_RETRIES: u32 = 3;

pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub rcsb_url: String,
    pub pdbe_url: String,
    pub uniprot_url: String,
    pub timeout_secs: u64,
    pub pool_size: usize,
    /// Attempts after the first for identifier lookups
    pub lookup_retries: u32,
    /// Base backoff, multiplied by the attempt number
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rcsb_url: DEFAULT_RCSB_URL.to_string(),
            pdbe_url: DEFAULT_PDBE_URL.to_string(),
            uniprot_url: DEFAULT_UNIPROT_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            pool_size: DEFAULT_POOL_SIZE,
            lookup_retries: DEFAULT_LOOKUP_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl ApiConfig {
    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PPI2PDB_RCSB_URL") {
            config.set_rcsb_url(url);
        }
        if let Ok(url) = std::env::var("PPI2PDB_PDBE_URL") {
            config.set_pdbe_url(url);
        }
        if let Ok(url) = std::env::var("PPI2PDB_UNIPROT_URL") {
            config.set_uniprot_url(url);
        }
        if let Some(secs) = env_number("PPI2PDB_API_TIMEOUT_SECS")? {
            config.timeout_secs = secs;
        }
        if let Some(size) = env_number("PPI2PDB_POOL_SIZE")? {
            config.set_pool_size(size);
        }
        if let Some(retries) = env_number("PPI2PDB_LOOKUP_RETRIES")? {
            config.lookup_retries = retries;
        }
        if let Some(delay) = env_number("PPI2PDB_RETRY_DELAY_MS")? {
            config.retry_delay_ms = delay;
        }

        Ok(config)
    }

    pub fn set_rcsb_url(&mut self, url: impl Into<String>) {
        self.rcsb_url = trim_slash(url.into());
    }

    pub fn set_pdbe_url(&mut self, url: impl Into<String>) {
        self.pdbe_url = trim_slash(url.into());
    }

    pub fn set_uniprot_url(&mut self, url: impl Into<String>) {
        self.uniprot_url = trim_slash(url.into());
    }

    /// Pool size is at least one
    pub fn set_pool_size(&mut self, size: usize) {
        self.pool_size = size.max(1);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::config(format!("{} must be a non-negative integer, got '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "PPI2PDB_RCSB_URL",
        "PPI2PDB_PDBE_URL",
        "PPI2PDB_UNIPROT_URL",
        "PPI2PDB_API_TIMEOUT_SECS",
        "PPI2PDB_POOL_SIZE",
        "PPI2PDB_LOOKUP_RETRIES",
        "PPI2PDB_RETRY_DELAY_MS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.pool_size, 16);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("PPI2PDB_PDBE_URL", "http://localhost:9000/pdbe");
        std::env::set_var("PPI2PDB_POOL_SIZE", "4");

        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.pdbe_url, "http://localhost:9000/pdbe");
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.rcsb_url, DEFAULT_RCSB_URL);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_config_error() {
        clear_env();
        std::env::set_var("PPI2PDB_API_TIMEOUT_SECS", "soon");

        let err = ApiConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("PPI2PDB_API_TIMEOUT_SECS"));

        clear_env();
    }

    #[test]
    fn test_setters() {
        let mut config = ApiConfig::default();
        config.set_uniprot_url("http://127.0.0.1:8080/");
        config.set_pool_size(0);
        assert_eq!(config.uniprot_url, "http://127.0.0.1:8080");
        assert_eq!(config.pool_size, 1);
    }
}
