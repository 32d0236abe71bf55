//! Table serialization
//!
//! Cells are already sanitized (no commas), so records are written without
//! quoting.

use crate::error::Result;
use ppi2pdb_common::types::OutputRow;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct OutputWriter {
    include_literature: bool,
    score_labels: Vec<String>,
}

impl OutputWriter {
    pub fn new(include_literature: bool, score_labels: Vec<String>) -> Self {
        Self {
            include_literature,
            score_labels,
        }
    }

    pub fn headers(&self) -> Vec<String> {
        OutputRow::headers(self.include_literature, &self.score_labels)
    }

    /// Write header and rows to any sink
    pub fn write_to<W: Write>(&self, sink: W, rows: &[OutputRow]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(sink);

        writer.write_record(self.headers())?;
        for row in rows {
            writer.write_record(row.cells(self.include_literature))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write one file, creating its parent directory if needed
    pub fn write_file(&self, path: &Path, rows: &[OutputRow]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file), rows)?;
        info!(path = %path.display(), rows = rows.len(), "Wrote table");
        Ok(())
    }
}

/// `<dir>/<stem>_<target>.<ext>` for an output name `<dir>/<stem>.<ext>`
pub fn split_path(output: &Path, target: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataframe".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{}_{}.{}", stem, target, ext.to_string_lossy()),
        None => format!("{}_{}.csv", stem, target),
    };
    output.with_file_name(name)
}
