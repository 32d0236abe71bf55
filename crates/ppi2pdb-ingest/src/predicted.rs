//! Predicted pair score files
//!
//! Comma-delimited with a header. `NameUPAC` holds the UniProt pair
//! `UP1-UP2` and `pDockQ` the model confidence. HuRI files also carry `Name`,
//! the same pair in Ensembl gene identifiers.
//!
//! ```text
//! Name,NameUPAC,pDockQ
//! ENSG00000141510-ENSG00000135679,P04637-Q00987,0.62
//! ```

use crate::error::{IngestError, Result};
use ppi2pdb_common::types::parse_score;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which dataset a score file comes from, inferred from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// HuRI predicted dimers, folders keyed by Ensembl gene pairs
    HuRI,
    /// hu.MAP predicted dimers, folders keyed by UniProt pairs
    HuMAP,
    Generic,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.contains("huri") {
            SourceKind::HuRI
        } else if name.contains("humap") {
            SourceKind::HuMAP
        } else {
            SourceKind::Generic
        }
    }

    /// Fixed score column label for known datasets
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SourceKind::HuRI => Some("pDockQ HuRI"),
            SourceKind::HuMAP => Some("pDockQ HuMap"),
            SourceKind::Generic => None,
        }
    }

    /// Whether rows of this kind are keyed by alternate identifiers
    pub fn has_alternate_ids(&self) -> bool {
        matches!(self, SourceKind::HuRI)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::HuRI => write!(f, "HuRI"),
            SourceKind::HuMAP => write!(f, "HuMAP"),
            SourceKind::Generic => write!(f, "generic"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "NameUPAC", default)]
    name_upac: Option<String>,
    #[serde(rename = "pDockQ")]
    pdockq: String,
}

/// One scored pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictedPair {
    /// UniProt accessions, absent when the file left them blank
    pub uniprot: Option<(String, String)>,
    /// Alternate-scheme identifiers (HuRI only)
    pub alternate: Option<(String, String)>,
    pub score: Decimal,
}

impl PredictedPair {
    /// (target, interactor) when either UniProt side is `target`
    pub fn oriented(&self, target: &str) -> Option<(&str, &str)> {
        let (up1, up2) = self.uniprot.as_ref()?;
        if up1 == target {
            Some((up1.as_str(), up2.as_str()))
        } else if up2 == target {
            Some((up2.as_str(), up1.as_str()))
        } else {
            None
        }
    }
}

/// Split `A-B` on the first dash. Both halves must be non-empty.
pub fn split_pair(value: &str) -> Option<(String, String)> {
    let (first, second) = value.trim().split_once('-')?;
    let (first, second) = (first.trim(), second.trim());
    if first.is_empty() || second.is_empty() {
        return None;
    }
    Some((first.to_string(), second.to_string()))
}

/// A loaded score file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictedSource {
    pub path: PathBuf,
    /// File name up to the first dot
    pub stem: String,
    pub kind: SourceKind,
    /// Output column label, see [`assign_labels`]
    pub label: String,
    pub pairs: Vec<PredictedPair>,
}

impl PredictedSource {
    /// Read the score file at `path`, dropping pairs below `cutoff`
    pub fn load(path: impl AsRef<Path>, cutoff: Decimal) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| IngestError::io(path, e))?;
        let source = Self::from_reader(file, path, cutoff)?;

        info!(
            path = %path.display(),
            kind = %source.kind,
            pairs = source.pairs.len(),
            "Loaded predicted scores"
        );

        Ok(source)
    }

    /// Read scores from any reader; kind and stem come from `path`
    pub fn from_reader<R: Read>(reader: R, path: impl Into<PathBuf>, cutoff: Decimal) -> Result<Self> {
        let path = path.into();
        let kind = SourceKind::from_path(&path);
        let stem = file_stem(&path);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| IngestError::csv(&path, e))?
            .clone();

        let mut pairs = Vec::new();
        let mut below_cutoff = 0usize;

        for row in reader.records() {
            let row = row.map_err(|e| IngestError::csv(&path, e))?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawPrediction = row
                .deserialize(Some(&headers))
                .map_err(|e| IngestError::csv(&path, e))?;

            let score = parse_score(&raw.pdockq).map_err(|_| IngestError::InvalidScore {
                path: path.clone(),
                line,
                value: raw.pdockq.clone(),
            })?;
            if score < cutoff {
                below_cutoff += 1;
                continue;
            }

            let invalid_pair = |value: &str| IngestError::InvalidPair {
                path: path.clone(),
                line,
                value: value.to_string(),
            };

            let uniprot = match raw.name_upac.as_deref().filter(|v| !v.is_empty()) {
                Some(value) => Some(split_pair(value).ok_or_else(|| invalid_pair(value))?),
                None => None,
            };
            let alternate = match raw.name.as_deref().filter(|v| !v.is_empty() && kind.has_alternate_ids()) {
                Some(value) => Some(split_pair(value).ok_or_else(|| invalid_pair(value))?),
                None => None,
            };

            if uniprot.is_none() && alternate.is_none() {
                return Err(invalid_pair(""));
            }

            pairs.push(PredictedPair {
                uniprot,
                alternate,
                score,
            });
        }

        debug!(kept = pairs.len(), below_cutoff, "Filtered predicted scores");

        let label = kind.label().map(str::to_string).unwrap_or_else(|| stem.clone());

        Ok(Self {
            path,
            stem,
            kind,
            label,
            pairs,
        })
    }
}

fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}

/// Load every score file in order and give each a distinct column label
pub fn load_all(paths: &[PathBuf], cutoff: Decimal) -> Result<Vec<PredictedSource>> {
    let mut sources = paths
        .iter()
        .map(|path| PredictedSource::load(path, cutoff))
        .collect::<Result<Vec<_>>>()?;
    assign_labels(&mut sources);
    Ok(sources)
}

/// Known datasets keep their fixed label. A label that is already taken
/// falls back to the file stem, then to the stem with its position.
pub fn assign_labels(sources: &mut [PredictedSource]) {
    let mut taken = HashSet::new();

    for (index, source) in sources.iter_mut().enumerate() {
        let preferred = source.kind.label().map(str::to_string).unwrap_or_else(|| source.stem.clone());

        let label = [preferred, source.stem.clone(), format!("{} {}", source.stem, index + 1)]
            .into_iter()
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| format!("{} {}", source.path.display(), index + 1));

        taken.insert(label.clone());
        source.label = label;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const HURI: &str = "\
Name,NameUPAC,pDockQ
ENSG00000141510-ENSG00000135679,P04637-Q00987,0.62
ENSG00000012048-ENSG00000139618,,0.71
ENSG00000141510-ENSG00000012048,P04637-P38398,0.31
";

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(SourceKind::from_path(Path::new("/data/HuRI_pdockq.csv")), SourceKind::HuRI);
        assert_eq!(SourceKind::from_path(Path::new("humap.scores.csv")), SourceKind::HuMAP);
        assert_eq!(SourceKind::from_path(Path::new("/huri/other.csv")), SourceKind::Generic);
    }

    #[test]
    fn test_split_pair_on_first_dash() {
        assert_eq!(split_pair("P1-P2"), Some(("P1".to_string(), "P2".to_string())));
        assert_eq!(split_pair("P1-P2-3"), Some(("P1".to_string(), "P2-3".to_string())));
        assert_eq!(split_pair("P1"), None);
        assert_eq!(split_pair("-P2"), None);
    }

    #[test]
    fn test_huri_rows_keep_alternate_ids() {
        let source = PredictedSource::from_reader(HURI.as_bytes(), "huri.csv", dec("0.5")).unwrap();
        assert_eq!(source.kind, SourceKind::HuRI);
        assert_eq!(source.label, "pDockQ HuRI");
        assert_eq!(source.pairs.len(), 2);

        let first = &source.pairs[0];
        assert_eq!(first.uniprot, Some(("P04637".to_string(), "Q00987".to_string())));
        assert_eq!(
            first.alternate,
            Some(("ENSG00000141510".to_string(), "ENSG00000135679".to_string()))
        );
        assert_eq!(first.score, dec("0.62"));

        assert_eq!(source.pairs[1].uniprot, None);
        assert!(source.pairs[1].alternate.is_some());
    }

    #[test]
    fn test_generic_source_uses_stem() {
        let content = "NameUPAC,pDockQ\nP04637-Q00987,0.5\n";
        let source = PredictedSource::from_reader(content.as_bytes(), "/tmp/my_models.v2.csv", dec("0.5")).unwrap();
        assert_eq!(source.kind, SourceKind::Generic);
        assert_eq!(source.stem, "my_models");
        assert_eq!(source.label, "my_models");
        assert_eq!(source.pairs[0].alternate, None);
    }

    #[test]
    fn test_oriented_pair() {
        let pair = PredictedPair {
            uniprot: Some(("P1".to_string(), "P2".to_string())),
            alternate: None,
            score: dec("0.9"),
        };
        assert_eq!(pair.oriented("P1"), Some(("P1", "P2")));
        assert_eq!(pair.oriented("P2"), Some(("P2", "P1")));
        assert_eq!(pair.oriented("P3"), None);
    }

    #[test]
    fn test_invalid_pair_and_score() {
        let bad_pair = "NameUPAC,pDockQ\nP04637,0.9\n";
        let err = PredictedSource::from_reader(bad_pair.as_bytes(), "humap.csv", dec("0.5")).unwrap_err();
        assert!(matches!(err, IngestError::InvalidPair { line: 2, .. }));

        let bad_score = "NameUPAC,pDockQ\nP1-P2,abc\n";
        let err = PredictedSource::from_reader(bad_score.as_bytes(), "humap.csv", dec("0.5")).unwrap_err();
        assert!(matches!(err, IngestError::InvalidScore { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_labels_fall_back_to_stem() {
        let content = "NameUPAC,pDockQ\nP1-P2,0.9\n";
        let mut sources = vec![
            PredictedSource::from_reader(content.as_bytes(), "huri_a.csv", Decimal::ZERO).unwrap(),
            PredictedSource::from_reader(content.as_bytes(), "huri_b.csv", Decimal::ZERO).unwrap(),
            PredictedSource::from_reader(content.as_bytes(), "b/huri_b.csv", Decimal::ZERO).unwrap(),
        ];
        assign_labels(&mut sources);

        let labels: Vec<_> = sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["pDockQ HuRI", "huri_b", "huri_b 3"]);
    }
}
