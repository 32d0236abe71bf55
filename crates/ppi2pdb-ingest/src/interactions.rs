//! Interaction table reader and filter
//!
//! The table is semicolon-delimited with a header row. Only the columns below
//! are read; anything else in the file is ignored.
//!
//! ```text
//! Protein A;Gene A;Taxon A;Protein B;Gene B;Taxon B;Score;PMID
//! P04637;TP53;9606;Q00987;MDM2;9606;0.999;8875929
//! ```

use crate::error::{IngestError, Result};
use ppi2pdb_common::types::{parse_score, InteractionRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RawInteraction {
    #[serde(rename = "Protein A")]
    protein_a: String,
    #[serde(rename = "Gene A", default)]
    gene_a: String,
    #[serde(rename = "Taxon A")]
    taxon_a: String,
    #[serde(rename = "Protein B")]
    protein_b: String,
    #[serde(rename = "Gene B", default)]
    gene_b: String,
    #[serde(rename = "Taxon B")]
    taxon_b: String,
    #[serde(rename = "Score")]
    score: String,
    #[serde(rename = "PMID", default)]
    pmid: Option<String>,
}

/// Human-human interactions at or above a score cutoff.
#[derive(Debug, Clone)]
pub struct InteractionTable {
    records: Vec<InteractionRecord>,
    cutoff: Decimal,
}

impl InteractionTable {
    /// Read and filter the table at `path`
    pub fn load(path: impl AsRef<Path>, cutoff: Decimal) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| IngestError::io(path, e))?;
        let table = Self::from_reader(file, path, cutoff)?;

        info!(
            path = %path.display(),
            kept = table.len(),
            cutoff = %cutoff,
            "Loaded interaction table"
        );

        Ok(table)
    }

    /// Read and filter a table from any reader; `origin` is used in errors
    pub fn from_reader<R: Read>(reader: R, origin: impl Into<PathBuf>, cutoff: Decimal) -> Result<Self> {
        let origin = origin.into();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| IngestError::csv(&origin, e))?
            .clone();

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for row in reader.records() {
            let row = row.map_err(|e| IngestError::csv(&origin, e))?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawInteraction = row
                .deserialize(Some(&headers))
                .map_err(|e| IngestError::csv(&origin, e))?;

            let score = parse_score(&raw.score).map_err(|_| IngestError::InvalidScore {
                path: origin.clone(),
                line,
                value: raw.score.clone(),
            })?;

            let record = InteractionRecord {
                protein_a: raw.protein_a,
                protein_b: raw.protein_b,
                gene_a: raw.gene_a,
                gene_b: raw.gene_b,
                taxon_a: raw.taxon_a,
                taxon_b: raw.taxon_b,
                score,
                literature_ref: raw.pmid.filter(|p| !p.is_empty()),
            };

            if passes_filter(&record, cutoff) {
                records.push(record);
            } else {
                dropped += 1;
            }
        }

        debug!(kept = records.len(), dropped, "Filtered interaction table");

        Ok(Self { records, cutoff })
    }

    /// Build a table from already-parsed records, applying the same filter
    pub fn from_records(records: impl IntoIterator<Item = InteractionRecord>, cutoff: Decimal) -> Self {
        Self {
            records: records
                .into_iter()
                .filter(|r| passes_filter(r, cutoff))
                .collect(),
            cutoff,
        }
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cutoff(&self) -> Decimal {
        self.cutoff
    }

    /// Records naming `target` on either side, in table order
    pub fn touching<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a InteractionRecord> + 'a {
        self.records.iter().filter(move |r| r.touches(target))
    }

    /// Gene name of a protein: first row listing it as A, else first row
    /// listing it as B
    pub fn gene_of(&self, protein: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.protein_a == protein)
            .map(|r| r.gene_a.as_str())
            .or_else(|| {
                self.records
                    .iter()
                    .find(|r| r.protein_b == protein)
                    .map(|r| r.gene_b.as_str())
            })
            .filter(|g| !g.is_empty())
    }

    /// Gene name of a target, taken from the first row that names it
    pub fn target_gene(&self, target: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.touches(target))
            .map(|r| if r.protein_a == target { r.gene_a.as_str() } else { r.gene_b.as_str() })
            .filter(|g| !g.is_empty())
    }

    /// Score recorded for the pair in either orientation. When the pair is
    /// listed more than once the last row wins.
    pub fn score_for(&self, a: &str, b: &str) -> Option<Decimal> {
        self.records
            .iter()
            .rev()
            .find(|r| is_pair(r, a, b))
            .map(|r| r.score)
    }

    /// Every literature reference recorded for the pair in either
    /// orientation, de-duplicated in first-seen order and space-joined
    pub fn literature_for(&self, a: &str, b: &str) -> Option<String> {
        let forward = self.records.iter().filter(|r| r.protein_a == a && r.protein_b == b);
        let reverse = self.records.iter().filter(|r| r.protein_a == b && r.protein_b == a);

        let mut refs: Vec<&str> = Vec::new();
        for reference in forward.chain(reverse).filter_map(|r| r.literature_ref.as_deref()) {
            if !refs.contains(&reference) {
                refs.push(reference);
            }
        }

        if refs.is_empty() {
            None
        } else {
            Some(refs.join(" "))
        }
    }
}

/// Human-human and at or above the cutoff
pub fn passes_filter(record: &InteractionRecord, cutoff: Decimal) -> bool {
    record.is_human_pair() && record.score >= cutoff
}

fn is_pair(record: &InteractionRecord, a: &str, b: &str) -> bool {
    (record.protein_a == a && record.protein_b == b) || (record.protein_a == b && record.protein_b == a)
}
