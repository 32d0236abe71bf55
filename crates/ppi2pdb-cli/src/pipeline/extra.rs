//! Predicted pair rows from external score files

use crate::api::IdentifierLookup;
use crate::error::Result;
use crate::pipeline::folders::FolderReconciler;
use futures::stream::{self, StreamExt};
use ppi2pdb_common::types::{PairKey, PredictedRow};
use ppi2pdb_ingest::interactions::InteractionTable;
use ppi2pdb_ingest::predicted::{PredictedPair, PredictedSource, SourceKind};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Fill in UniProt accessions for pairs that only carry alternate
/// identifiers. Pairs that cannot be resolved are dropped.
pub async fn recover_accessions<L: IdentifierLookup + ?Sized>(
    lookup: &L,
    sources: &mut [PredictedSource],
    concurrency: usize,
) {
    let pending: BTreeSet<String> = sources
        .iter()
        .flat_map(|s| s.pairs.iter())
        .filter(|p| p.uniprot.is_none())
        .filter_map(|p| p.alternate.as_ref())
        .flat_map(|(a, b)| [a.clone(), b.clone()])
        .collect();

    if pending.is_empty() {
        return;
    }
    info!(identifiers = pending.len(), "Resolving alternate identifiers");

    let resolved: HashMap<String, String> = stream::iter(pending)
        .map(|alternate| async move {
            match lookup.primary_accession(&alternate).await {
                Ok(Some(accession)) => Some((alternate, accession)),
                Ok(None) => {
                    warn!(identifier = %alternate, "No accession found");
                    None
                },
                Err(e) => {
                    warn!(identifier = %alternate, "Accession lookup failed: {}", e);
                    None
                },
            }
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|resolved| async move { resolved })
        .collect()
        .await;

    for source in sources.iter_mut() {
        source.pairs.retain_mut(|pair| {
            if pair.uniprot.is_some() {
                return true;
            }
            let Some((a, b)) = pair.alternate.as_ref() else {
                return false;
            };
            match (resolved.get(a), resolved.get(b)) {
                (Some(up1), Some(up2)) => {
                    pair.uniprot = Some((up1.clone(), up2.clone()));
                    true
                },
                _ => {
                    warn!(pair = %format!("{}-{}", a, b), "Dropping pair without accessions");
                    false
                },
            }
        });
    }
}

/// Matches predicted pairs to targets and resolves their gene names
pub struct ExtraDatasetMerger<'a, L: IdentifierLookup + ?Sized> {
    lookup: &'a L,
    table: &'a InteractionTable,
    sources: &'a [PredictedSource],
}

struct Match<'s> {
    source_index: usize,
    kind: SourceKind,
    pair: &'s PredictedPair,
    key: PairKey,
}

impl<'a, L: IdentifierLookup + ?Sized> ExtraDatasetMerger<'a, L> {
    pub fn new(lookup: &'a L, table: &'a InteractionTable, sources: &'a [PredictedSource]) -> Self {
        Self {
            lookup,
            table,
            sources,
        }
    }

    /// Score column labels in source order
    pub fn labels(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.label.clone()).collect()
    }

    /// One row per predicted pair touching `target`, per source file.
    ///
    /// Matched pairs also have their prediction folders reconciled when
    /// `folders` is given; folder errors abort the run.
    pub async fn rows_for(
        &self,
        target: &str,
        mut folders: Option<&mut FolderReconciler>,
    ) -> Result<Vec<PredictedRow>> {
        let matches = self.matches(target);

        if let Some(folders) = folders.as_deref_mut() {
            for m in &matches {
                folders.reconcile(m.kind, m.pair)?;
            }
        }

        let mut genes: HashMap<String, Option<String>> = HashMap::new();
        let mut rows = Vec::with_capacity(matches.len());

        for m in matches {
            let target_gene = self.gene(&m.key.target, &mut genes).await;
            let interactor_gene = self.gene(&m.key.interactor, &mut genes).await;

            rows.push(PredictedRow {
                key: m.key,
                target_gene,
                interactor_gene,
                source_index: m.source_index,
                score: m.pair.score,
            });
        }

        info!(target_id = target, rows = rows.len(), "Built predicted rows");
        Ok(rows)
    }

    fn matches(&self, target: &str) -> Vec<Match<'a>> {
        let mut matches = Vec::new();

        for (source_index, source) in self.sources.iter().enumerate() {
            for pair in &source.pairs {
                if let Some((t, i)) = pair.oriented(target) {
                    matches.push(Match {
                        source_index,
                        kind: source.kind,
                        pair,
                        key: PairKey::new(t, i),
                    });
                }
            }
        }

        matches
    }

    /// Gene name from the table (as protein A, then as protein B), else from
    /// the identifier lookup. Unresolved names stay empty.
    async fn gene(&self, protein: &str, cache: &mut HashMap<String, Option<String>>) -> Option<String> {
        if let Some(gene) = cache.get(protein) {
            return gene.clone();
        }

        let gene = match self.table.gene_of(protein) {
            Some(gene) => Some(gene.to_string()),
            None => match self.lookup.gene_name(protein).await {
                Ok(gene) => gene,
                Err(e) => {
                    warn!(protein, "Gene lookup failed: {}", e);
                    None
                },
            },
        };

        debug!(protein, gene = ?gene, "Resolved gene");
        cache.insert(protein.to_string(), gene.clone());
        gene
    }
}
