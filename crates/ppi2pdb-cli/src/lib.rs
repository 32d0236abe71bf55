//! ppi2pdb CLI Library
//!
//! Enriches a protein-protein interaction table with structural evidence.
//!
//! # Overview
//!
//! For every target accession the run:
//!
//! - **Discovers** interactors in the interaction table and the PDB entries
//!   each pair shares, annotated with chain mappings, method and resolution
//! - **Applies overrides** from a curated INI file
//! - **Folds in predicted pairs** from HuRI, HuMAP or other score files,
//!   reconciling their prediction folders on disk
//! - **Writes** one reconciled table (or one per target) and optionally a
//!   FASTA tree for pair structure prediction

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// ppi2pdb - structural evidence for protein-protein interactions
#[derive(Parser, Debug, Clone)]
#[command(name = "ppi2pdb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Semicolon-delimited interaction table
    #[arg(short, long)]
    pub interactions: PathBuf,

    /// Target UniProt accessions, one per line
    #[arg(short, long)]
    pub targets: PathBuf,

    /// Minimum interaction score (inclusive)
    #[arg(short = 's', long)]
    pub cutoff: Decimal,

    /// Output table
    #[arg(short, long, default_value = "dataframe.csv")]
    pub output: PathBuf,

    /// Skip pairs of a protein with itself
    #[arg(short, long)]
    pub filter_self: bool,

    /// Include the PMID column
    #[arg(short, long)]
    pub pmid: bool,

    /// Write one table per target (<stem>_<target>.csv)
    #[arg(short = 'x', long)]
    pub split: bool,

    /// Generate FASTA inputs for every (target, interactor) gene pair
    #[arg(short = 'a', long)]
    pub fasta: bool,

    /// Root of the FASTA tree
    #[arg(long, default_value = "inputs_afmulti")]
    pub fasta_dir: PathBuf,

    /// Override config (INI, one section per target)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Predicted pair score files (HuRI, HuMAP, ...)
    #[arg(long, num_args = 1..)]
    pub extra_files: Vec<PathBuf>,

    /// Minimum predicted confidence (inclusive)
    #[arg(long, default_value = "0.5")]
    pub extra_cutoff: Decimal,

    /// Root of the downloaded prediction folders
    #[arg(long)]
    pub af_folder: Option<PathBuf>,

    /// Root of the reconciled prediction folders
    #[arg(long, default_value = "AF_Huri_HuMAP")]
    pub af_output: PathBuf,

    /// Parallel evidence fetches per target
    #[arg(long, default_value_t = 16)]
    pub concurrency: usize,

    /// Structure search base URL
    #[arg(long, env = "PPI2PDB_RCSB_URL")]
    pub rcsb_url: Option<String>,

    /// Structure annotation base URL
    #[arg(long, env = "PPI2PDB_PDBE_URL")]
    pub pdbe_url: Option<String>,

    /// Identifier lookup base URL
    #[arg(long, env = "PPI2PDB_UNIPROT_URL")]
    pub uniprot_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ppi2pdb", "-i", "table.csv", "-t", "targets.txt", "-s", "0.42"]).unwrap();
        assert_eq!(cli.cutoff, Decimal::new(42, 2));
        assert_eq!(cli.output, PathBuf::from("dataframe.csv"));
        assert_eq!(cli.extra_cutoff, Decimal::new(5, 1));
        assert_eq!(cli.concurrency, 16);
        assert!(cli.extra_files.is_empty());
        assert!(!cli.split && !cli.pmid && !cli.fasta);
    }

    #[test]
    fn test_extra_files_and_flags() {
        let cli = Cli::try_parse_from([
            "ppi2pdb", "-i", "t.csv", "-t", "x.txt", "-s", "0.5", "-x", "-p", "-f", "--extra-files", "huri.csv",
            "humap.csv", "--af-folder", "af",
        ])
        .unwrap();
        assert_eq!(cli.extra_files, vec![PathBuf::from("huri.csv"), PathBuf::from("humap.csv")]);
        assert!(cli.split && cli.pmid && cli.filter_self);
        assert_eq!(cli.af_folder, Some(PathBuf::from("af")));
    }

    #[test]
    fn test_missing_cutoff_is_rejected() {
        assert!(Cli::try_parse_from(["ppi2pdb", "-i", "t.csv", "-t", "x.txt"]).is_err());
        assert!(Cli::try_parse_from(["ppi2pdb", "-i", "t.csv", "-t", "x.txt", "-s", "high"]).is_err());
    }
}
