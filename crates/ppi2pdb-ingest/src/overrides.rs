//! Curated override file
//!
//! INI format: each section is a target accession, each entry value is
//! `interactorId,interactorGene,structureId,literatureRef`. The structure and
//! literature fields may be empty.
//!
//! ```ini
//! [P04637]
//! mdm2 = Q00987,MDM2,1YCR,8875929
//! brca1 = P38398,BRCA1,,
//! ```

use crate::error::{IngestError, Result};
use config::{Config, File, FileFormat, Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One curated (target, interactor) correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub interactor_id: String,
    pub interactor_gene: String,
    /// `None` asks for a filler row
    pub structure_id: Option<String>,
    pub literature_ref: Option<String>,
}

impl OverrideEntry {
    /// Parse one entry value; the error is a human-readable reason
    pub fn parse(value: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = value.split(',').map(str::trim).collect();

        if fields.len() != 4 {
            return Err(format!("expected 4 comma-separated fields, found {}", fields.len()));
        }
        if fields[0].is_empty() {
            return Err("interactor id is empty".to_string());
        }

        let optional = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };

        Ok(Self {
            interactor_id: fields[0].to_string(),
            interactor_gene: fields[1].to_string(),
            structure_id: optional(fields[2]),
            literature_ref: optional(fields[3]),
        })
    }
}

/// Override entries grouped by target section, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideConfig {
    sections: Vec<(String, Vec<OverrideEntry>)>,
}

impl OverrideConfig {
    /// Read the override file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let overrides = Self::from_source(File::from(path).format(FileFormat::Ini).required(true), path)?;

        info!(
            path = %path.display(),
            sections = overrides.sections.len(),
            entries = overrides.len(),
            "Loaded override config"
        );

        Ok(overrides)
    }

    /// Parse override content held in memory; `origin` is used in errors
    pub fn parse(content: &str, origin: impl Into<PathBuf>) -> Result<Self> {
        Self::from_source(File::from_str(content, FileFormat::Ini), origin.into())
    }

    fn from_source<S>(source: S, path: impl Into<PathBuf>) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let path = path.into();
        let config_error = |source| IngestError::Config {
            path: path.clone(),
            source,
        };

        let settings = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_error)?;
        let table: Map<String, Value> = settings.try_deserialize().map_err(config_error)?;

        let mut sections = Vec::new();
        for (section, value) in table {
            let entries = match value.into_table() {
                Ok(entries) => entries,
                Err(_) => {
                    warn!(key = %section, "Ignoring override entry outside of a target section");
                    continue;
                },
            };

            let mut parsed = Vec::with_capacity(entries.len());
            for (name, value) in entries {
                let invalid = |reason: String| IngestError::InvalidOverride {
                    path: path.clone(),
                    section: section.clone(),
                    entry: name.clone(),
                    reason,
                };

                let raw = value.into_string().map_err(|e| invalid(e.to_string()))?;
                parsed.push(OverrideEntry::parse(&raw).map_err(invalid)?);
            }

            debug!(target_id = %section, entries = parsed.len(), "Parsed override section");
            sections.push((section, parsed));
        }

        Ok(Self { sections })
    }

    /// Entries for `target`. Section names match case-insensitively; an
    /// absent section yields no entries.
    pub fn entries_for(&self, target: &str) -> &[OverrideEntry] {
        self.sections
            .iter()
            .find(|(section, _)| section.eq_ignore_ascii_case(target))
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Section names in file order
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(section, _)| section.as_str())
    }

    /// Total number of entries across sections
    pub fn len(&self) -> usize {
        self.sections.iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const OVERRIDES: &str = "\
[P04637]
mdm2 = Q00987, MDM2, 1YCR, 8875929
brca1 = P38398,BRCA1,,

[Q06609]
brca2 = P51587,BRCA2,1N0W,
";

    #[test]
    fn test_entry_parse() {
        let entry = OverrideEntry::parse(" Q00987 , MDM2 ,1YCR, 8875929").unwrap();
        assert_eq!(entry.interactor_id, "Q00987");
        assert_eq!(entry.interactor_gene, "MDM2");
        assert_eq!(entry.structure_id.as_deref(), Some("1YCR"));
        assert_eq!(entry.literature_ref.as_deref(), Some("8875929"));

        let filler = OverrideEntry::parse("P38398,BRCA1,,").unwrap();
        assert_eq!(filler.structure_id, None);
        assert_eq!(filler.literature_ref, None);
    }

    #[test]
    fn test_entry_parse_rejects_wrong_arity() {
        assert!(OverrideEntry::parse("Q00987,MDM2,1YCR").is_err());
        assert!(OverrideEntry::parse("Q00987,MDM2,1YCR,1,extra").is_err());
        assert!(OverrideEntry::parse(",MDM2,1YCR,1").is_err());
    }

    #[test]
    fn test_sections_and_lookup() {
        let overrides = OverrideConfig::parse(OVERRIDES, "overrides.ini").unwrap();
        assert_eq!(overrides.len(), 3);

        let entries = overrides.entries_for("P04637");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].interactor_id, "Q00987");
        assert_eq!(entries[1].interactor_id, "P38398");

        assert_eq!(overrides.entries_for("q06609").len(), 1);
        assert!(overrides.entries_for("P99999").is_empty());
    }

    #[test]
    fn test_sections_keep_file_order() {
        let overrides = OverrideConfig::parse(OVERRIDES, "overrides.ini").unwrap();
        let targets: Vec<String> = overrides.targets().map(str::to_ascii_uppercase).collect();
        assert_eq!(targets, vec!["P04637", "Q06609"]);
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_invalid_entry_names_section() {
        let err = OverrideConfig::parse("[P04637]\nbad = Q00987,MDM2\n", "bad.ini").unwrap_err();
        match err {
            IngestError::InvalidOverride { section, entry, .. } => {
                assert!(section.eq_ignore_ascii_case("P04637"));
                assert_eq!(entry, "bad");
            },
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".ini").unwrap();
        write!(file, "{}", OVERRIDES).unwrap();

        let overrides = OverrideConfig::load(file.path()).unwrap();
        assert_eq!(overrides.entries_for("Q06609")[0].structure_id.as_deref(), Some("1N0W"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = OverrideConfig::load("/nonexistent/overrides.ini").unwrap_err();
        assert!(matches!(err, IngestError::Config { .. }));
    }
}
