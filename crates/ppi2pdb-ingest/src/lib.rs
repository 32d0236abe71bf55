//! ppi2pdb Ingest Library
//!
//! Readers for every input the enrichment pipeline consumes.
//!
//! # Supported Inputs
//!
//! - **Interaction table**: semicolon-delimited protein-protein interactions,
//!   filtered to human-human pairs at or above a score cutoff
//! - **Target list**: one UniProt accession per line
//! - **Override config**: INI sections of curated (interactor, gene, structure,
//!   literature) entries keyed by target
//! - **Predicted pairs**: comma-delimited structural-prediction scores (HuRI,
//!   HuMAP and similar)
//!
//! # Example
//!
//! ```no_run
//! use ppi2pdb_ingest::{interactions::InteractionTable, targets};
//! use rust_decimal::Decimal;
//!
//! fn main() -> ppi2pdb_ingest::Result<()> {
//!     let table = InteractionTable::load("mentha.csv", Decimal::new(5, 1))?;
//!     for target in targets::load("targets.txt")? {
//!         println!("{} has {} interactions", target, table.touching(&target).count());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod interactions;
pub mod overrides;
pub mod predicted;
pub mod targets;

pub use error::{IngestError, Result};
