//! Structure evidence for protein pairs
//!
//! Failures never escape this module: a failed search is an empty set and a
//! failed annotation endpoint only blanks the fields it would have filled.

use crate::api::{EntryMappings, EntrySummary, ExperimentEntry, StructureApi};
use crate::error::Result;
use ppi2pdb_common::types::{Field, ResidueSpan, StructureEvidence, StructureId};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::{debug, warn};

pub struct EvidenceResolver<'a, A: StructureApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: StructureApi + ?Sized> EvidenceResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Structures referencing both proteins. Empty when either search fails
    /// or finds nothing.
    pub async fn shared_structures(&self, a: &str, b: &str) -> BTreeSet<String> {
        let (left, right) = futures::join!(self.search(a), self.search(b));

        let shared: BTreeSet<String> = left.intersection(&right).cloned().collect();
        debug!(a, b, shared = shared.len(), "Shared structures");
        shared
    }

    async fn search(&self, accession: &str) -> BTreeSet<String> {
        match self.api.search_structures(accession).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!(accession, "Structure search failed: {}", e);
                BTreeSet::new()
            },
        }
    }

    /// Evidence for one structure, oriented around `target` and `interactor`.
    ///
    /// Malformed identifiers return all-unavailable evidence without any
    /// request being made.
    pub async fn evidence_for(&self, structure_id: &str, target: &str, interactor: &str) -> StructureEvidence {
        let id = match StructureId::parse(structure_id) {
            Ok(id) => id,
            Err(e) => {
                warn!("{}", e);
                return StructureEvidence::unavailable(structure_id);
            },
        };

        let (summary, mappings, experiment) = futures::join!(
            self.api.entry_summary(&id),
            self.api.uniprot_mappings(&id),
            self.api.entry_experiment(&id),
        );

        let mut evidence = StructureEvidence::unavailable(id.as_str());
        apply_summary(&mut evidence, degrade(&id, "summary", summary));
        apply_mappings(&mut evidence, degrade(&id, "mappings", mappings), target, interactor);
        apply_experiment(&mut evidence, degrade(&id, "experiment", experiment));
        evidence
    }
}

fn degrade<T>(id: &StructureId, endpoint: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(structure = %id, endpoint, "Annotation unavailable: {}", e);
            None
        },
    }
}

fn apply_summary(evidence: &mut StructureEvidence, summary: Option<EntrySummary>) {
    let Some(summary) = summary else { return };

    evidence.fused = Field::Value(StructureEvidence::is_fusion_title(&summary.title));
    evidence.method = Field::from_option(summary.experimental_method.into_iter().next());
    evidence.dna_chains = Field::from_option(summary.number_of_entities.dna);
    evidence.ligands = Field::from_option(summary.number_of_entities.ligand);
}

/// Chains of the target and interactor; every other accession in the entry
/// is another interactor
fn apply_mappings(evidence: &mut StructureEvidence, mappings: Option<EntryMappings>, target: &str, interactor: &str) {
    let Some(mappings) = mappings else { return };

    let mut target_spans = Vec::new();
    let mut interactor_spans = Vec::new();
    let mut others = Vec::new();

    for (accession, entry) in mappings.uniprot {
        if accession != target && accession != interactor {
            others.push(accession);
            continue;
        }

        let spans = entry.mappings.iter().map(|m| ResidueSpan {
            chain_id: m.chain_id.clone(),
            start: m.unp_start,
            end: m.unp_end,
        });
        if accession == target {
            target_spans.extend(spans.clone());
        }
        if accession == interactor {
            interactor_spans.extend(spans);
        }
    }

    evidence.target_spans = Field::from_list(target_spans);
    evidence.interactor_spans = Field::from_list(interactor_spans);
    evidence.other_interactors = Field::from_list(others);
}

fn apply_experiment(evidence: &mut StructureEvidence, experiment: Option<ExperimentEntry>) {
    let Some(experiment) = experiment else { return };

    evidence.resolution = Field::from_option(
        experiment
            .resolution
            .and_then(|n| Decimal::from_str(&n.to_string()).ok()),
    );
}
