//! `ppi2pdb` run implementation
//!
//! Loads every input, processes targets one at a time and writes the
//! reconciled table(s).

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::error::{CliError, Result};
use crate::pipeline::folders::FolderLayout;
use crate::pipeline::output::split_path;
use crate::pipeline::reconcile::sort_rows;
use crate::pipeline::{
    recover_accessions, ExtraDatasetMerger, FastaWriter, FolderReconciler, OutputWriter, OverrideResolver,
    Reconciler, RowBuilder,
};
use crate::progress;
use crate::Cli;
use colored::Colorize;
use ppi2pdb_common::types::{OutputRow, SourceRow};
use ppi2pdb_ingest::interactions::InteractionTable;
use ppi2pdb_ingest::overrides::OverrideConfig;
use ppi2pdb_ingest::{predicted, targets};
use std::path::PathBuf;
use tracing::{info, warn};

/// What a run produced
#[derive(Debug, Default)]
pub struct RunSummary {
    pub targets: usize,
    pub rows: usize,
    pub tables: Vec<PathBuf>,
    pub fasta_files: usize,
}

/// API settings from the environment, with command-line URLs on top
pub fn api_config(cli: &Cli) -> Result<ApiConfig> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = &cli.rcsb_url {
        config.set_rcsb_url(url.as_str());
    }
    if let Some(url) = &cli.pdbe_url {
        config.set_pdbe_url(url.as_str());
    }
    if let Some(url) = &cli.uniprot_url {
        config.set_uniprot_url(url.as_str());
    }
    Ok(config)
}

pub async fn run(cli: &Cli) -> Result<RunSummary> {
    let table = InteractionTable::load(&cli.interactions, cli.cutoff)?;
    let targets = targets::load(&cli.targets)?;
    let overrides = match &cli.config {
        Some(path) => OverrideConfig::load(path)?,
        None => OverrideConfig::default(),
    };
    let mut sources = predicted::load_all(&cli.extra_files, cli.extra_cutoff)?;

    info!(
        interactions = table.len(),
        targets = targets.len(),
        override_sections = overrides.len(),
        predicted_sources = sources.len(),
        "Inputs loaded"
    );

    let needs_folders = sources.iter().any(|s| FolderLayout::for_kind(s.kind).is_some());
    let mut folders = match (&cli.af_folder, needs_folders) {
        (Some(af), true) => Some(FolderReconciler::new(af, &cli.af_output)),
        (None, true) => {
            return Err(CliError::config(
                "--af-folder is required when HuRI or HuMAP score files are given",
            ))
        },
        (_, false) => None,
    };

    let client = ApiClient::new(api_config(cli)?)?;
    recover_accessions(&client, &mut sources, client.config().pool_size).await;

    let merger = ExtraDatasetMerger::new(&client, &table, &sources);
    let labels = merger.labels();
    let reconciler = Reconciler::new(labels.len());
    let writer = OutputWriter::new(cli.pmid, labels);
    let row_builder = RowBuilder::new(&client, &table)
        .filter_self(cli.filter_self)
        .concurrency(cli.concurrency);
    let override_resolver = OverrideResolver::new(&client, &table, &overrides).concurrency(cli.concurrency);

    let mut summary = RunSummary {
        targets: targets.len(),
        ..RunSummary::default()
    };
    let mut all_rows: Vec<OutputRow> = Vec::new();

    let pb = progress::create_target_progress(targets.len() as u64, cli.quiet);
    for target in &targets {
        pb.set_message(target.clone());

        let discovered = row_builder.build(target).await;
        let override_rows = override_resolver.build(target).await;
        let predicted = merger.rows_for(target, folders.as_mut()).await?;

        let rows = reconciler.reconcile(
            discovered
                .into_iter()
                .map(SourceRow::Discovered)
                .chain(override_rows.into_iter().map(SourceRow::Override))
                .chain(predicted.into_iter().map(SourceRow::Predicted)),
        );

        if rows.is_empty() {
            warn!(target_id = %target, "No rows for target");
        }

        if cli.split {
            let path = split_path(&cli.output, target);
            writer.write_file(&path, &rows)?;
            summary.tables.push(path);
        }

        all_rows.extend(rows);
        pb.inc(1);
    }
    pb.finish_and_clear();

    summary.rows = all_rows.len();

    if !cli.split {
        sort_rows(&mut all_rows);
        writer.write_file(&cli.output, &all_rows)?;
        summary.tables.push(cli.output.clone());
    }

    if cli.fasta {
        summary.fasta_files = FastaWriter::new(&client, &cli.fasta_dir).write_pairs(&all_rows).await?;
    }

    Ok(summary)
}

/// Print the run summary to stdout
pub fn report(summary: &RunSummary, cli: &Cli) {
    println!(
        "{} Processed {} ({})",
        "✓".green(),
        progress::plural(summary.targets, "target"),
        progress::plural(summary.rows, "row")
    );
    for table in &summary.tables {
        println!("{} Wrote {}", "→".cyan(), table.display());
    }
    if cli.fasta {
        println!(
            "{} Wrote {} under {}",
            "→".cyan(),
            progress::plural(summary.fasta_files, "FASTA file"),
            cli.fasta_dir.display()
        );
    }
}
