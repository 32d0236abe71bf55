//! Common types used across ppi2pdb

mod evidence;
mod rows;

pub use evidence::{Field, ResidueSpan, StructureEvidence, EVIDENCE_COLUMNS, EVIDENCE_HEADERS};
pub use rows::{
    AnnotatedRow, MergeKey, Origin, OutputRow, PairIdentity, PredictedRow, SourceRow,
    LITERATURE_HEADER, PAIR_HEADERS,
};

use crate::error::{Ppi2PdbError, Result};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Sentinels
// ============================================================================

/// Rendered for values that were looked up and found to be empty, and for
/// anything still missing once a table has been reconciled.
pub const NA: &str = "na";

/// Rendered for values whose endpoint could not be queried.
pub const UNAVAILABLE: &str = "none";

/// NCBI taxonomy identifier for Homo sapiens.
pub const HUMAN_TAXON: &str = "9606";

/// Replace characters that would break an unquoted comma-separated cell.
pub fn sanitize_cell(value: &str) -> String {
    value.replace(',', "_")
}

// ============================================================================
// Interaction Types
// ============================================================================

/// One row of the base interaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub protein_a: String,
    pub protein_b: String,
    pub gene_a: String,
    pub gene_b: String,
    pub taxon_a: String,
    pub taxon_b: String,
    pub score: Decimal,
    pub literature_ref: Option<String>,
}

impl InteractionRecord {
    /// Both partners are human proteins
    pub fn is_human_pair(&self) -> bool {
        self.taxon_a == HUMAN_TAXON && self.taxon_b == HUMAN_TAXON
    }

    /// Either partner is the given protein
    pub fn touches(&self, protein: &str) -> bool {
        self.protein_a == protein || self.protein_b == protein
    }

    pub fn is_self_interaction(&self) -> bool {
        self.protein_a == self.protein_b
    }

    /// Orient the record around `target`.
    ///
    /// Returns `None` when the record does not name the target.
    pub fn oriented(&self, target: &str) -> Option<OrientedPair> {
        if self.protein_a == target {
            Some(OrientedPair {
                key: PairKey::new(&self.protein_a, &self.protein_b),
                target_gene: self.gene_a.clone(),
                interactor_gene: self.gene_b.clone(),
            })
        } else if self.protein_b == target {
            Some(OrientedPair {
                key: PairKey::new(&self.protein_b, &self.protein_a),
                target_gene: self.gene_b.clone(),
                interactor_gene: self.gene_a.clone(),
            })
        } else {
            None
        }
    }
}

/// A (target, interactor) pair with the target always first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub target: String,
    pub interactor: String,
}

impl PairKey {
    pub fn new(target: impl Into<String>, interactor: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            interactor: interactor.into(),
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.target, self.interactor)
    }
}

/// An interaction record oriented around a target, with gene names on the
/// matching sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedPair {
    pub key: PairKey,
    pub target_gene: String,
    pub interactor_gene: String,
}

// ============================================================================
// Structure Identifiers
// ============================================================================

/// A validated PDB entry identifier, stored upper-case.
///
/// Valid identifiers are exactly four alphanumeric characters: a digit, a
/// letter, then two letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(String);

impl StructureId {
    pub fn parse(raw: &str) -> Result<Self> {
        let pattern = Regex::new(r"^[0-9][A-Za-z][A-Za-z0-9]{2}$")?;
        let trimmed = raw.trim();

        if !pattern.is_match(trimmed) {
            return Err(Ppi2PdbError::InvalidStructureId(raw.to_string()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case form used as the key in annotation API responses
    pub fn api_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse an exact decimal score, trimming surrounding whitespace.
pub fn parse_score(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| Ppi2PdbError::InvalidScore(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(a: &str, b: &str) -> InteractionRecord {
        InteractionRecord {
            protein_a: a.to_string(),
            protein_b: b.to_string(),
            gene_a: format!("gene{}", a),
            gene_b: format!("gene{}", b),
            taxon_a: HUMAN_TAXON.to_string(),
            taxon_b: HUMAN_TAXON.to_string(),
            score: Decimal::from_str("0.5").unwrap(),
            literature_ref: None,
        }
    }

    #[test]
    fn test_structure_id_validation() {
        assert_eq!(StructureId::parse("1ycr").unwrap().as_str(), "1YCR");
        assert_eq!(StructureId::parse(" 4HFZ ").unwrap().as_str(), "4HFZ");
        assert_eq!(StructureId::parse("1YCR").unwrap().api_key(), "1ycr");

        assert!(StructureId::parse("").is_err());
        assert!(StructureId::parse("ABCD").is_err());
        assert!(StructureId::parse("11CR").is_err());
        assert!(StructureId::parse("1YC").is_err());
        assert!(StructureId::parse("1YCRX").is_err());
        assert!(StructureId::parse("1Y-R").is_err());
    }

    #[test]
    fn test_oriented_pair_puts_target_first() {
        let rec = record("P1", "P2");

        let forward = rec.oriented("P1").unwrap();
        assert_eq!(forward.key, PairKey::new("P1", "P2"));
        assert_eq!(forward.target_gene, "geneP1");
        assert_eq!(forward.interactor_gene, "geneP2");

        let reverse = rec.oriented("P2").unwrap();
        assert_eq!(reverse.key, PairKey::new("P2", "P1"));
        assert_eq!(reverse.target_gene, "geneP2");
        assert_eq!(reverse.interactor_gene, "geneP1");

        assert!(rec.oriented("P3").is_none());
    }

    #[test]
    fn test_human_pair() {
        let mut rec = record("P1", "P2");
        assert!(rec.is_human_pair());
        rec.taxon_b = "10090".to_string();
        assert!(!rec.is_human_pair());
    }

    #[test]
    fn test_parse_score_is_exact() {
        let score = parse_score(" 0.950 ").unwrap();
        assert_eq!(score.to_string(), "0.950");
        assert!(parse_score("high").is_err());
    }

    #[test]
    fn test_sanitize_cell() {
        assert_eq!(sanitize_cell("a,b,c"), "a_b_c");
        assert_eq!(sanitize_cell("plain"), "plain");
    }
}
