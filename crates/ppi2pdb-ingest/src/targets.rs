//! Target accession list
//!
//! One accession per line. Blank lines and `#` comments are skipped and
//! repeated accessions keep their first position.

use crate::error::{IngestError, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Read the target list at `path`
pub fn load(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let targets = parse(&content);

    if targets.is_empty() {
        warn!(path = %path.display(), "Target list is empty");
    } else {
        info!(path = %path.display(), count = targets.len(), "Loaded targets");
    }

    Ok(targets)
}

/// Parse target list content
pub fn parse(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(line.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_blanks_comments_and_duplicates() {
        let content = "# targets\nP04637\n\n  Q00987  \nP04637\r\n# trailing\n";
        assert_eq!(parse(content), vec!["P04637", "Q00987"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "P38398").unwrap();
        writeln!(file, "Q06609").unwrap();

        let targets = load(file.path()).unwrap();
        assert_eq!(targets, vec!["P38398", "Q06609"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/nonexistent/targets.txt").unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
