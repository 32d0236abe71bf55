//! API client module
//!
//! HTTP access to the structure search, structure annotation and
//! identifier-lookup services. Pipeline code depends on the two traits
//! below, never on the concrete client.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;
use ppi2pdb_common::types::StructureId;

/// Structure search and per-entry annotation endpoints
#[async_trait]
pub trait StructureApi: Send + Sync {
    /// Human structures referencing a UniProt accession
    async fn search_structures(&self, accession: &str) -> Result<Vec<String>>;

    async fn entry_summary(&self, id: &StructureId) -> Result<EntrySummary>;

    async fn uniprot_mappings(&self, id: &StructureId) -> Result<EntryMappings>;

    async fn entry_experiment(&self, id: &StructureId) -> Result<ExperimentEntry>;
}

/// Identifier and sequence lookups
#[async_trait]
pub trait IdentifierLookup: Send + Sync {
    /// Primary gene name of the first search hit
    async fn gene_name(&self, accession: &str) -> Result<Option<String>>;

    /// Primary UniProt accession for an alternate identifier
    async fn primary_accession(&self, alternate_id: &str) -> Result<Option<String>>;

    /// Representative sequence of a human UniRef cluster.
    ///
    /// `None` when the search returned no clusters; an empty string when it
    /// did but none was a human cluster for this accession.
    async fn representative_sequence(&self, accession: &str) -> Result<Option<String>>;
}
