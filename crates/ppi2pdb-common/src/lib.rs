//! ppi2pdb Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the ppi2pdb workspace.
//!
//! # Overview
//!
//! - **Types**: interaction records, structure evidence, and the row shapes
//!   that flow from discovery, overrides and predicted datasets into the
//!   reconciled output table
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Error Handling**: the shared error and result types
//!
//! # Example
//!
//! ```no_run
//! use ppi2pdb_common::types::StructureId;
//!
//! fn main() -> ppi2pdb_common::Result<()> {
//!     let id = StructureId::parse("1ycr")?;
//!     assert_eq!(id.as_str(), "1YCR");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Ppi2PdbError, Result};
