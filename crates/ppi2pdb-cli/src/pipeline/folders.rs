//! Prediction folder reconciliation
//!
//! Downloaded prediction trees are keyed by whatever identifiers their
//! dataset uses. Matched pairs are copied (structure files only) into an
//! output tree keyed by UniProt pairs:
//!
//! ```text
//! HuRI   <af>/Huri_dimers/HuRI/<ALT1-ALT2>  ->  <out>/Huri_dimers/<UP1-UP2>
//! HuMAP  <af>/HuMAP_dimers/pdb/<UP1-UP2>   ->  <out>/HuMAP_dimers/<UP1-UP2>
//! ```

use crate::error::{CliError, Result};
use ppi2pdb_ingest::predicted::{PredictedPair, SourceKind};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Where a dataset's pair folders live and where they go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderLayout {
    /// Path below the download root holding the pair folders
    pub source: &'static [&'static str],
    /// Path below the output root receiving them
    pub destination: &'static [&'static str],
    /// Source folders are named by alternate identifiers
    pub keyed_by_alternate: bool,
}

impl FolderLayout {
    pub fn for_kind(kind: SourceKind) -> Option<Self> {
        match kind {
            SourceKind::HuRI => Some(Self {
                source: &["Huri_dimers", "HuRI"],
                destination: &["Huri_dimers"],
                keyed_by_alternate: true,
            }),
            SourceKind::HuMAP => Some(Self {
                source: &["HuMAP_dimers", "pdb"],
                destination: &["HuMAP_dimers"],
                keyed_by_alternate: false,
            }),
            SourceKind::Generic => None,
        }
    }
}

fn join_all(root: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(root.to_path_buf(), |path, part| path.join(part))
}

fn pair_name((first, second): &(String, String)) -> String {
    format!("{}-{}", first, second)
}

/// Copies each matched pair folder once per run
pub struct FolderReconciler {
    download_root: PathBuf,
    output_root: PathBuf,
    done: HashSet<(SourceKind, String)>,
}

impl FolderReconciler {
    pub fn new(download_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            download_root: download_root.into(),
            output_root: output_root.into(),
            done: HashSet::new(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Copy the pair's prediction folder into the output tree.
    ///
    /// A missing source folder or an existing destination is an error.
    pub fn reconcile(&mut self, kind: SourceKind, pair: &PredictedPair) -> Result<()> {
        let Some(layout) = FolderLayout::for_kind(kind) else {
            return Ok(());
        };
        let Some(uniprot) = pair.uniprot.as_ref() else {
            return Ok(());
        };

        let source_key = if layout.keyed_by_alternate {
            match pair.alternate.as_ref() {
                Some(alternate) => pair_name(alternate),
                None => {
                    return Err(CliError::config(format!(
                        "{} pair {} has no alternate identifiers to locate its folder",
                        kind,
                        pair_name(uniprot)
                    )))
                },
            }
        } else {
            pair_name(uniprot)
        };

        if !self.done.insert((kind, source_key.clone())) {
            debug!(pair = %source_key, "Prediction folder already reconciled");
            return Ok(());
        }

        let source = join_all(&self.download_root, layout.source).join(&source_key);
        let destination_dir = join_all(&self.output_root, layout.destination);
        let staged = destination_dir.join(&source_key);
        let destination = destination_dir.join(pair_name(uniprot));

        if !source.is_dir() {
            return Err(CliError::folder_missing(source));
        }
        if staged.exists() {
            return Err(CliError::folder_exists(staged));
        }
        if destination.exists() {
            return Err(CliError::folder_exists(destination));
        }

        copy_structures(&source, &staged)?;
        if staged != destination {
            std::fs::rename(&staged, &destination)?;
        }

        info!(from = %source.display(), to = %destination.display(), "Reconciled prediction folder");
        Ok(())
    }
}

/// Copy a directory tree, keeping only `.pdb` files
pub fn copy_structures(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| CliError::Other(e.into()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if entry.path().extension().is_some_and(|ext| ext == "pdb") {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}
