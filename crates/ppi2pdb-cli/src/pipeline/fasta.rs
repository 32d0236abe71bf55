//! Two-sequence FASTA inputs for pair structure prediction
//!
//! Layout: `<root>/<targetGene>/<interactorGene>/input.fasta`

use crate::api::IdentifierLookup;
use crate::error::Result;
use ppi2pdb_common::types::OutputRow;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FASTA_FILE_NAME: &str = "input.fasta";

/// Cut a gene name at the first space or `{`
pub fn clean_gene(gene: &str) -> &str {
    let end = gene.find([' ', '{']).unwrap_or(gene.len());
    &gene[..end]
}

pub struct FastaWriter<'a, L: IdentifierLookup + ?Sized> {
    lookup: &'a L,
    root: PathBuf,
}

impl<'a, L: IdentifierLookup + ?Sized> FastaWriter<'a, L> {
    pub fn new(lookup: &'a L, root: impl Into<PathBuf>) -> Self {
        Self {
            lookup,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one FASTA file per distinct (target, interactor) with gene names.
    /// Returns the number of files written.
    ///
    /// Sequences are cached while consecutive rows share a target and looked
    /// up again for the next target.
    pub async fn write_pairs(&self, rows: &[OutputRow]) -> Result<usize> {
        let mut seen = HashSet::new();
        let mut sequences: HashMap<String, Option<String>> = HashMap::new();
        let mut current_target: Option<&str> = None;
        let mut written = 0;

        for row in rows {
            if current_target != Some(row.key.target.as_str()) {
                sequences.clear();
                current_target = Some(row.key.target.as_str());
            }
            let (Some(target_gene), Some(interactor_gene)) = (&row.target_gene, &row.interactor_gene) else {
                debug!(pair = %row.key, "No gene names, skipping FASTA");
                continue;
            };
            if !seen.insert(row.key.clone()) {
                continue;
            }

            let Some(target_seq) = self.sequence(&row.key.target, &mut sequences).await else {
                continue;
            };
            let Some(interactor_seq) = self.sequence(&row.key.interactor, &mut sequences).await else {
                continue;
            };

            let target_gene = clean_gene(target_gene);
            let interactor_gene = clean_gene(interactor_gene);
            let dir = self.root.join(target_gene).join(interactor_gene);
            std::fs::create_dir_all(&dir)?;
            std::fs::write(
                dir.join(FASTA_FILE_NAME),
                format!(">{}\n{}\n>{}\n{}\n", target_gene, target_seq, interactor_gene, interactor_seq),
            )?;
            written += 1;
        }

        info!(root = %self.root.display(), files = written, "Wrote FASTA pairs");
        Ok(written)
    }

    async fn sequence(&self, accession: &str, cache: &mut HashMap<String, Option<String>>) -> Option<String> {
        if let Some(sequence) = cache.get(accession) {
            return sequence.clone();
        }

        let sequence = match self.lookup.representative_sequence(accession).await {
            Ok(Some(sequence)) => Some(sequence),
            Ok(None) => {
                warn!(accession, "No sequence clusters found, skipping pair");
                None
            },
            Err(e) => {
                warn!(accession, "Sequence lookup failed: {}", e);
                None
            },
        };

        cache.insert(accession.to_string(), sequence.clone());
        sequence
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::pipeline::extra::tests::FakeLookup;
    use ppi2pdb_common::types::{AnnotatedRow, Origin, PairKey};
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn row(target: &str, tgene: Option<&str>, interactor: &str, igene: Option<&str>) -> OutputRow {
        OutputRow::from_annotated(
            AnnotatedRow::new(
                PairKey::new(target, interactor),
                tgene.map(str::to_string),
                igene.map(str::to_string),
                None,
            ),
            Origin::Discovered,
            0,
        )
    }

    #[test]
    fn test_clean_gene() {
        assert_eq!(clean_gene("TP53"), "TP53");
        assert_eq!(clean_gene("MDM2 {ECO:0000312}"), "MDM2");
        assert_eq!(clean_gene("CDK2{ECO}"), "CDK2");
    }

    #[tokio::test]
    async fn test_write_pairs() {
        let dir = TempDir::new().unwrap();
        let mut lookup = FakeLookup::default();
        lookup.sequences.insert("P1".to_string(), "MEEP".to_string());
        lookup.sequences.insert("P2".to_string(), "MCNT".to_string());

        let rows = vec![
            row("P1", Some("TP53"), "P2", Some("MDM2 {ECO:1}")),
            row("P1", Some("TP53"), "P2", Some("MDM2 {ECO:1}")),
            row("P1", Some("TP53"), "P3", None),
            row("P1", Some("TP53"), "P4", Some("GENE4")),
        ];

        let writer = FastaWriter::new(&lookup, dir.path());
        let written = writer.write_pairs(&rows).await.unwrap();
        assert_eq!(written, 1);

        let text = std::fs::read_to_string(dir.path().join("TP53").join("MDM2").join(FASTA_FILE_NAME)).unwrap();
        assert_eq!(text, ">TP53\nMEEP\n>MDM2\nMCNT\n");
        assert!(!dir.path().join("TP53").join("GENE4").exists());
    }

    #[tokio::test]
    async fn test_sequences_are_looked_up_per_target() {
        let dir = TempDir::new().unwrap();
        let mut lookup = FakeLookup::default();
        for (accession, sequence) in [("P1", "MEEP"), ("P2", "MCNT"), ("P5", "MKLV")] {
            lookup.sequences.insert(accession.to_string(), sequence.to_string());
        }

        let rows = vec![
            row("P5", Some("CDK2"), "P2", Some("MDM2")),
            row("P1", Some("TP53"), "P2", Some("MDM2")),
            row("P1", Some("TP53"), "P5", Some("CDK2")),
        ];

        let writer = FastaWriter::new(&lookup, dir.path());
        assert_eq!(writer.write_pairs(&rows).await.unwrap(), 3);

        // P5 and P2 for the first target, then P1, P2 and P5 again for the second
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 5);
        let text = std::fs::read_to_string(dir.path().join("TP53").join("CDK2").join(FASTA_FILE_NAME)).unwrap();
        assert_eq!(text, ">TP53\nMEEP\n>CDK2\nMKLV\n");
    }
}
