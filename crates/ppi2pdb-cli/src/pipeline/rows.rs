//! Discovered rows: interaction table pairs annotated with shared structures

use crate::api::StructureApi;
use crate::pipeline::evidence::EvidenceResolver;
use futures::stream::{self, StreamExt};
use ppi2pdb_common::types::{AnnotatedRow, OrientedPair, PairIdentity};
use ppi2pdb_ingest::interactions::InteractionTable;
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, info};

pub struct RowBuilder<'a, A: StructureApi + ?Sized> {
    resolver: EvidenceResolver<'a, A>,
    table: &'a InteractionTable,
    filter_self: bool,
    concurrency: usize,
}

struct PendingPair {
    pair: OrientedPair,
    score: Decimal,
    literature_ref: Option<String>,
}

impl<'a, A: StructureApi + ?Sized> RowBuilder<'a, A> {
    pub fn new(api: &'a A, table: &'a InteractionTable) -> Self {
        Self {
            resolver: EvidenceResolver::new(api),
            table,
            filter_self: false,
            concurrency: 1,
        }
    }

    /// Skip pairs whose two sides are the same protein
    pub fn filter_self(mut self, filter: bool) -> Self {
        self.filter_self = filter;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// One row per (interactor, shared structure), or one filler row per
    /// interactor without shared structures
    pub async fn build(&self, target: &str) -> Vec<AnnotatedRow> {
        let pairs = self.pending_pairs(target);

        let structures: Vec<Vec<String>> = stream::iter(pairs.iter())
            .map(|p| async move {
                self.resolver
                    .shared_structures(&p.pair.key.target, &p.pair.key.interactor)
                    .await
                    .into_iter()
                    .collect()
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let triples: Vec<(&PendingPair, Option<String>)> = pairs
            .iter()
            .zip(structures)
            .flat_map(|(pair, ids)| {
                if ids.is_empty() {
                    vec![(pair, None)]
                } else {
                    ids.into_iter().map(|id| (pair, Some(id))).collect()
                }
            })
            .collect();

        let rows: Vec<AnnotatedRow> = stream::iter(triples)
            .map(|(pending, structure_id)| async move {
                let row = AnnotatedRow::new(
                    pending.pair.key.clone(),
                    Some(pending.pair.target_gene.clone()),
                    Some(pending.pair.interactor_gene.clone()),
                    Some(pending.score),
                )
                .with_literature(pending.literature_ref.clone());

                match structure_id {
                    Some(id) => {
                        let evidence = self
                            .resolver
                            .evidence_for(&id, &pending.pair.key.target, &pending.pair.key.interactor)
                            .await;
                        row.with_evidence(evidence)
                    },
                    None => row,
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(target_id = target, pairs = pairs.len(), rows = rows.len(), "Built discovered rows");
        rows
    }

    /// Oriented pairs touching `target`, first occurrence of each pair only
    fn pending_pairs(&self, target: &str) -> Vec<PendingPair> {
        let mut seen: HashSet<PairIdentity> = HashSet::new();
        let mut pairs = Vec::new();

        for record in self.table.touching(target) {
            if self.filter_self && record.is_self_interaction() {
                info!(target_id = target, "Skipped self-interaction");
                continue;
            }
            let Some(pair) = record.oriented(target) else { continue };

            let identity = AnnotatedRow::new(
                pair.key.clone(),
                Some(pair.target_gene.clone()),
                Some(pair.interactor_gene.clone()),
                None,
            )
            .identity();
            if !seen.insert(identity) {
                debug!(pair = %pair.key, "Pair listed more than once, keeping the first row");
                continue;
            }

            let literature_ref = self.table.literature_for(&pair.key.target, &pair.key.interactor);
            pairs.push(PendingPair {
                pair,
                score: record.score,
                literature_ref,
            });
        }

        pairs
    }
}
