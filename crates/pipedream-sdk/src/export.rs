//! Named exports surfaced to the host.
//!
//! Each export appends one line, `name:json=<value>\n`, to the file named by
//! `PIPEDREAM_EXPORTS`. The file is opened and closed per call and never
//! read back here.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, SdkError};
use crate::json::to_export_json;

/// Appends export lines to the host's exports file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    path: PathBuf,
}

impl Exporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `name:json=<value>` (newline-terminated).
    pub fn export<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let line = format_export_line(name, value)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.write_error(source))?;
        file.write_all(line.as_bytes())
            .map_err(|source| self.write_error(source))?;
        tracing::debug!(name, path = %self.path.display(), "value exported");
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> SdkError {
        SdkError::WriteExports {
            path: self.path.clone(),
            source,
        }
    }
}

/// The exact line appended for one export.
pub fn format_export_line<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<String> {
    Ok(format!("{name}:json={}\n", to_export_json(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_format() {
        assert_eq!(
            format_export_line("x", &json!({"a": 1})).unwrap(),
            "x:json={\"a\": 1}\n"
        );
        assert_eq!(format_export_line("s", "hi").unwrap(), "s:json=\"hi\"\n");
    }

    #[test]
    fn test_appends_without_touching_prior_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports");
        std::fs::write(&path, "earlier:json=1\n").unwrap();

        let exporter = Exporter::new(&path);
        exporter.export("x", &json!({"a": 1})).unwrap();
        exporter.export("y", &[1, 2]).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "earlier:json=1\nx:json={\"a\": 1}\ny:json=[1, 2]\n"
        );
    }

    #[test]
    fn test_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new-exports");
        Exporter::new(&path).export("n", &3).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "n:json=3\n");
    }

    #[test]
    fn test_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("exports");
        let err = Exporter::new(&path).export("n", &3).unwrap_err();
        assert!(matches!(err, SdkError::WriteExports { .. }));
    }
}
