//! Override rows from the curated config, built independently of discovery

use crate::api::StructureApi;
use crate::pipeline::evidence::EvidenceResolver;
use futures::stream::{self, StreamExt};
use ppi2pdb_common::types::{AnnotatedRow, PairKey};
use ppi2pdb_ingest::interactions::InteractionTable;
use ppi2pdb_ingest::overrides::{OverrideConfig, OverrideEntry};
use tracing::{debug, info};

pub struct OverrideResolver<'a, A: StructureApi + ?Sized> {
    resolver: EvidenceResolver<'a, A>,
    table: &'a InteractionTable,
    overrides: &'a OverrideConfig,
    concurrency: usize,
}

impl<'a, A: StructureApi + ?Sized> OverrideResolver<'a, A> {
    pub fn new(api: &'a A, table: &'a InteractionTable, overrides: &'a OverrideConfig) -> Self {
        Self {
            resolver: EvidenceResolver::new(api),
            table,
            overrides,
            concurrency: 1,
        }
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// One row per config entry of `target`, in config order
    pub async fn build(&self, target: &str) -> Vec<AnnotatedRow> {
        let entries = self.overrides.entries_for(target);
        if entries.is_empty() {
            debug!(target_id = target, "No override section");
            return Vec::new();
        }

        let target_gene = self.table.target_gene(target).map(str::to_string);

        let rows: Vec<AnnotatedRow> = stream::iter(entries)
            .map(|entry| self.row_for(target, target_gene.clone(), entry))
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(target_id = target, rows = rows.len(), "Built override rows");
        rows
    }

    async fn row_for(&self, target: &str, target_gene: Option<String>, entry: &OverrideEntry) -> AnnotatedRow {
        let key = PairKey::new(target, entry.interactor_id.as_str());

        match &entry.structure_id {
            // Explicit filler: the pair may not be in the table at all
            None => AnnotatedRow::new(key, target_gene, Some(entry.interactor_gene.clone()), None)
                .with_literature(entry.literature_ref.clone()),
            Some(structure_id) => {
                let score = self.table.score_for(target, &entry.interactor_id);
                let evidence = self
                    .resolver
                    .evidence_for(structure_id, target, &entry.interactor_id)
                    .await;

                AnnotatedRow::new(key, target_gene, Some(entry.interactor_gene.clone()), score)
                    .with_evidence(evidence)
                    .with_literature(entry.literature_ref.clone())
            },
        }
    }
}
