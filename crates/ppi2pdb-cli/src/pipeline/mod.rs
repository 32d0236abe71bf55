//! Enrichment pipeline
//!
//! Discovered rows ([`rows`]), override rows ([`overrides`]) and predicted
//! rows ([`extra`]) are produced per target and merged by [`reconcile`].
//! Everything here is generic over the API traits.

pub mod evidence;
pub mod extra;
pub mod fasta;
pub mod folders;
pub mod output;
pub mod overrides;
pub mod reconcile;
pub mod rows;

pub use evidence::EvidenceResolver;
pub use extra::{recover_accessions, ExtraDatasetMerger};
pub use fasta::FastaWriter;
pub use folders::FolderReconciler;
pub use output::OutputWriter;
pub use overrides::OverrideResolver;
pub use reconcile::Reconciler;
pub use rows::RowBuilder;
