//! Row shapes produced by the discovery, override and predicted runs, and
//! the canonical row they collapse into during reconciliation

use super::evidence::{StructureEvidence, EVIDENCE_HEADERS};
use super::{sanitize_cell, PairKey, NA};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Header labels for the pair columns, in output order
pub const PAIR_HEADERS: [&str; 5] = [
    "target uniprot id",
    "target uniprot gene",
    "interactor uniprot id",
    "interactor uniprot gene",
    "interaction score",
];

/// Header label for the literature reference column
pub const LITERATURE_HEADER: &str = "PMID";

/// Where a row came from. Merge bookkeeping only, never written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Discovered,
    Override,
    /// Present in both the discovery and the override run
    Merged,
    Predicted,
}

/// Treat blank gene names as missing so merge keys compare consistently.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A discovered or override row: one pair, optionally one structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    pub key: PairKey,
    pub target_gene: Option<String>,
    pub interactor_gene: Option<String>,
    pub score: Option<Decimal>,
    /// `None` for a filler row
    pub evidence: Option<StructureEvidence>,
    pub literature_ref: Option<String>,
}

impl AnnotatedRow {
    pub fn new(
        key: PairKey,
        target_gene: Option<String>,
        interactor_gene: Option<String>,
        score: Option<Decimal>,
    ) -> Self {
        Self {
            key,
            target_gene: non_blank(target_gene),
            interactor_gene: non_blank(interactor_gene),
            score,
            evidence: None,
            literature_ref: None,
        }
    }

    pub fn with_evidence(mut self, evidence: StructureEvidence) -> Self {
        self.evidence = Some(evidence);
        self
    }

    pub fn with_literature(mut self, literature_ref: Option<String>) -> Self {
        self.literature_ref = non_blank(literature_ref);
        self
    }

    pub fn is_filler(&self) -> bool {
        self.evidence.is_none()
    }

    pub fn identity(&self) -> PairIdentity {
        PairIdentity::new(&self.key, &self.target_gene, &self.interactor_gene)
    }

    pub fn merge_key(&self) -> MergeKey {
        MergeKey {
            pair: self.identity(),
            structure_id: self.evidence.as_ref().map(|e| e.structure_id.clone()),
        }
    }
}

/// A pair scored by an external structural-prediction dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedRow {
    pub key: PairKey,
    pub target_gene: Option<String>,
    pub interactor_gene: Option<String>,
    /// Position of the contributing file among the predicted sources
    pub source_index: usize,
    pub score: Decimal,
}

impl PredictedRow {
    pub fn identity(&self) -> PairIdentity {
        PairIdentity::new(&self.key, &self.target_gene, &self.interactor_gene)
    }
}

/// Rows as they arrive at the reconciler, tagged by provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRow {
    Discovered(AnnotatedRow),
    Override(AnnotatedRow),
    Predicted(PredictedRow),
}

/// (target id, target gene, interactor id, interactor gene)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairIdentity {
    pub target_id: String,
    pub target_gene: Option<String>,
    pub interactor_id: String,
    pub interactor_gene: Option<String>,
}

impl PairIdentity {
    fn new(key: &PairKey, target_gene: &Option<String>, interactor_gene: &Option<String>) -> Self {
        Self {
            target_id: key.target.clone(),
            target_gene: target_gene.clone(),
            interactor_id: key.interactor.clone(),
            interactor_gene: interactor_gene.clone(),
        }
    }
}

/// Rows with equal merge keys from different origins are coalesced.
///
/// Filler rows have no structure id and match each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeKey {
    pub pair: PairIdentity,
    pub structure_id: Option<String>,
}

/// The canonical row of the reconciled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub origin: Origin,
    pub key: PairKey,
    pub target_gene: Option<String>,
    pub interactor_gene: Option<String>,
    pub score: Option<Decimal>,
    pub evidence: Option<StructureEvidence>,
    pub literature_ref: Option<String>,
    /// One slot per predicted source, in source order
    pub predicted_scores: Vec<Option<Decimal>>,
}

impl OutputRow {
    pub fn from_annotated(row: AnnotatedRow, origin: Origin, sources: usize) -> Self {
        Self {
            origin,
            key: row.key,
            target_gene: row.target_gene,
            interactor_gene: row.interactor_gene,
            score: row.score,
            evidence: row.evidence,
            literature_ref: row.literature_ref,
            predicted_scores: vec![None; sources],
        }
    }

    pub fn from_predicted(row: &PredictedRow, sources: usize) -> Self {
        let mut predicted_scores = vec![None; sources.max(row.source_index + 1)];
        predicted_scores[row.source_index] = Some(row.score);

        Self {
            origin: Origin::Predicted,
            key: row.key.clone(),
            target_gene: row.target_gene.clone(),
            interactor_gene: row.interactor_gene.clone(),
            score: None,
            evidence: None,
            literature_ref: None,
            predicted_scores,
        }
    }

    pub fn identity(&self) -> PairIdentity {
        PairIdentity::new(&self.key, &self.target_gene, &self.interactor_gene)
    }

    pub fn structure_id(&self) -> Option<&str> {
        self.evidence.as_ref().map(|e| e.structure_id.as_str())
    }

    pub fn merge_key(&self) -> MergeKey {
        MergeKey {
            pair: self.identity(),
            structure_id: self.structure_id().map(str::to_string),
        }
    }

    /// Record a predicted score without touching any other column.
    pub fn set_predicted_score(&mut self, source_index: usize, score: Decimal) {
        if self.predicted_scores.len() <= source_index {
            self.predicted_scores.resize(source_index + 1, None);
        }
        self.predicted_scores[source_index] = Some(score);
    }

    /// Header row matching [`OutputRow::cells`]
    pub fn headers(include_literature: bool, score_labels: &[String]) -> Vec<String> {
        let mut headers: Vec<String> = PAIR_HEADERS.iter().map(|h| h.to_string()).collect();
        headers.extend(EVIDENCE_HEADERS.iter().map(|h| h.to_string()));
        if include_literature {
            headers.push(LITERATURE_HEADER.to_string());
        }
        headers.extend(score_labels.iter().map(|label| sanitize_cell(label)));
        headers
    }

    /// Render every column. Anything still missing becomes `na`; commas
    /// inside values become underscores.
    pub fn cells(&self, include_literature: bool) -> Vec<String> {
        let or_na = |value: Option<String>| value.unwrap_or_else(|| NA.to_string());

        let mut cells = vec![
            self.key.target.clone(),
            or_na(self.target_gene.clone()),
            self.key.interactor.clone(),
            or_na(self.interactor_gene.clone()),
            or_na(self.score.map(|s| s.to_string())),
        ];

        match &self.evidence {
            Some(evidence) => cells.extend(evidence.cells()),
            None => cells.extend(StructureEvidence::filler_cells()),
        }

        if include_literature {
            cells.push(or_na(self.literature_ref.clone()));
        }

        cells.extend(
            self.predicted_scores
                .iter()
                .map(|s| or_na(s.map(|s| s.to_string()))),
        );

        cells.iter().map(|c| sanitize_cell(c)).collect()
    }
}
