//! Structure evidence for a (target, interactor, structure) triple

use super::{NA, UNAVAILABLE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A value fetched from an external endpoint.
///
/// `Empty` means the endpoint answered and had nothing for this field;
/// `Unavailable` means the endpoint could not be queried at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field<T> {
    Value(T),
    Empty,
    Unavailable,
}

impl<T> Field<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Empty,
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Field::Unavailable)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Value(v) => Field::Value(f(v)),
            Field::Empty => Field::Empty,
            Field::Unavailable => Field::Unavailable,
        }
    }

    fn render_with(&self, f: impl FnOnce(&T) -> String) -> String {
        match self {
            Field::Value(v) => f(v),
            Field::Empty => NA.to_string(),
            Field::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

impl<T: Display> Field<T> {
    pub fn render(&self) -> String {
        self.render_with(|v| v.to_string())
    }
}

impl<T> Field<Vec<T>> {
    /// An empty list collapses to `Empty`
    pub fn from_list(values: Vec<T>) -> Self {
        if values.is_empty() {
            Field::Empty
        } else {
            Field::Value(values)
        }
    }
}

/// One chain segment mapped onto a UniProt sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueSpan {
    pub chain_id: String,
    pub start: i64,
    pub end: i64,
}

/// Facts about one resolved structure, relative to a target and an interactor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureEvidence {
    pub structure_id: String,
    pub fused: Field<bool>,
    pub method: Field<String>,
    pub resolution: Field<Decimal>,
    pub dna_chains: Field<u32>,
    pub ligands: Field<u32>,
    pub target_spans: Field<Vec<ResidueSpan>>,
    pub interactor_spans: Field<Vec<ResidueSpan>>,
    pub other_interactors: Field<Vec<String>>,
}

/// Number of columns contributed by a structure (or its filler)
pub const EVIDENCE_COLUMNS: usize = 13;

/// Header labels for the evidence columns, in output order
pub const EVIDENCE_HEADERS: [&str; EVIDENCE_COLUMNS] = [
    "PDB id",
    "fusion",
    "target chain id",
    "target starting residue",
    "target ending residue",
    "interactor chain id",
    "interactor starting residue",
    "interactor ending residue",
    "other interactors",
    "method",
    "resolution",
    "dna chains",
    "num ligands",
];

impl StructureEvidence {
    /// Evidence for a structure none of whose endpoints could be queried
    pub fn unavailable(structure_id: impl Into<String>) -> Self {
        Self {
            structure_id: structure_id.into(),
            fused: Field::Unavailable,
            method: Field::Unavailable,
            resolution: Field::Unavailable,
            dna_chains: Field::Unavailable,
            ligands: Field::Unavailable,
            target_spans: Field::Unavailable,
            interactor_spans: Field::Unavailable,
            other_interactors: Field::Unavailable,
        }
    }

    /// Fusion constructs are flagged by a case-sensitive title match
    pub fn is_fusion_title(title: &str) -> bool {
        title.contains("fused") || title.contains("fusion")
    }

    /// Render the evidence columns in output order
    pub fn cells(&self) -> [String; EVIDENCE_COLUMNS] {
        [
            self.structure_id.clone(),
            self.fused
                .render_with(|fused| if *fused { "yes".to_string() } else { NA.to_string() }),
            render_spans(&self.target_spans, |s| s.chain_id.clone()),
            render_spans(&self.target_spans, |s| s.start.to_string()),
            render_spans(&self.target_spans, |s| s.end.to_string()),
            render_spans(&self.interactor_spans, |s| s.chain_id.clone()),
            render_spans(&self.interactor_spans, |s| s.start.to_string()),
            render_spans(&self.interactor_spans, |s| s.end.to_string()),
            self.other_interactors.render_with(|ids| ids.join(";")),
            self.method.render(),
            self.resolution.render(),
            self.dna_chains.render(),
            self.ligands.render(),
        ]
    }

    /// Cells for a pair without structural evidence
    pub fn filler_cells() -> [String; EVIDENCE_COLUMNS] {
        std::array::from_fn(|_| NA.to_string())
    }
}

fn render_spans(spans: &Field<Vec<ResidueSpan>>, part: impl Fn(&ResidueSpan) -> String) -> String {
    spans.render_with(|spans| spans.iter().map(part).collect::<Vec<_>>().join(";"))
}
