// src/report.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::process::writer::write_document;
use crate::schema::Dataset;

/// A row that produced no document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row: usize,
    pub message: String,
}

/// Outcome of one pipeline over one CSV table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub dataset: Dataset,
    pub csv_path: PathBuf,
    pub rows_read: u64,
    pub headers_skipped: u64,
    pub written: Vec<PathBuf>,
    /// Codes seen on more than one row; the last row's document is kept.
    #[serde(default)]
    pub duplicate_codes: Vec<String>,
    pub failures: Vec<RowFailure>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

impl RunReport {
    pub fn new(dataset: Dataset, csv_path: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Self {
            dataset,
            csv_path: csv_path.into(),
            rows_read: 0,
            headers_skipped: 0,
            written: Vec::new(),
            duplicate_codes: Vec::new(),
            failures: Vec::new(),
            started: now,
            finished: now,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn log_summary(&self) {
        let elapsed_ms = (self.finished - self.started).num_milliseconds();
        if self.is_clean() {
            info!(
                dataset = %self.dataset,
                rows = self.rows_read,
                written = self.written.len(),
                duplicates = self.duplicate_codes.len(),
                elapsed_ms,
                "pipeline finished"
            );
        } else {
            warn!(
                dataset = %self.dataset,
                rows = self.rows_read,
                written = self.written.len(),
                failed = self.failures.len(),
                duplicates = self.duplicate_codes.len(),
                elapsed_ms,
                "pipeline finished with skipped rows"
            );
        }
    }
}

/// Write all reports to `path` as pretty JSON, atomically like documents.
pub fn write_reports(path: &Path, reports: &[RunReport]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(reports).context("serializing run report")?;
    json.push('\n');
    write_document(path, &json).with_context(|| format!("writing report {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reports_serialize_as_json_array() -> Result<()> {
        let dir = tempdir()?;
        let mut report = RunReport::new(Dataset::Range, "rng.csv");
        report.rows_read = 2;
        report.written.push(PathBuf::from("rng/aSNAK_CONUS_Range_2001v1.xml"));
        report.failures.push(RowFailure {
            row: 3,
            message: "unmapped taxon code `xFOO`".into(),
        });
        assert!(!report.is_clean());

        let path = dir.path().join("report.json");
        write_reports(&path, &[report])?;

        let back: Vec<RunReport> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].dataset, Dataset::Range);
        assert_eq!(back[0].failures[0].row, 3);
        assert!(fs::read_to_string(&path)?.contains("\"dataset\": \"range\""));
        Ok(())
    }

    #[test]
    fn report_write_replaces_and_leaves_no_temp_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("reports/run.json");
        write_reports(&path, &[RunReport::new(Dataset::Range, "rng.csv")])?;
        write_reports(&path, &[RunReport::new(Dataset::Habitat, "hab.csv")])?;

        let text = fs::read_to_string(&path)?;
        assert!(text.ends_with("]\n"));
        let back: Vec<RunReport> = serde_json::from_str(&text)?;
        assert_eq!(back[0].dataset, Dataset::Habitat);
        assert!(back[0].duplicate_codes.is_empty());

        let leftovers: Vec<_> = fs::read_dir(dir.path().join("reports"))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }

    #[test]
    fn older_reports_without_duplicates_still_load() -> Result<()> {
        let mut value = serde_json::to_value(RunReport::new(Dataset::Range, "rng.csv"))?;
        value
            .as_object_mut()
            .expect("report is an object")
            .remove("duplicate_codes");
        let back: RunReport = serde_json::from_value(value)?;
        assert!(back.duplicate_codes.is_empty());
        Ok(())
    }
}
