//! Tabular test data: the case CSV and the free-text `Test Data` field.
//!
//! The table is both input and output: each row names a case by id and
//! carries its parameters; the runner writes `Status` and `Remarks` back
//! and persists the whole table after every case. A destination that
//! cannot be opened for writing falls back to a `_temp` sibling so a
//! viewer holding the file open never loses results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SuiteResult;

pub const STATUS_PASSED: &str = "Passed";
pub const STATUS_FAILED: &str = "Failed";

/// One row of the case table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "TC ID")]
    pub tc_id: String,
    #[serde(rename = "Test Data", default)]
    pub test_data: String,
    #[serde(rename = "Expected Result", default)]
    pub expected: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Remarks", default)]
    pub remarks: String,
}

/// In-memory case table bound to its CSV source.
#[derive(Debug)]
pub struct ResultTable {
    path: PathBuf,
    records: Vec<CaseRecord>,
}

impl ResultTable {
    pub fn load(path: &Path) -> SuiteResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: CaseRecord = row?;
            records.push(record);
        }
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// First row with this id; duplicates beyond the first are inert.
    pub fn find(&self, tc_id: &str) -> Option<&CaseRecord> {
        self.records.iter().find(|r| r.tc_id == tc_id)
    }

    /// Write status and remarks onto the first row matching `tc_id`.
    pub fn record(&mut self, tc_id: &str, status: &str, remarks: &str) {
        if let Some(row) = self.records.iter_mut().find(|r| r.tc_id == tc_id) {
            row.status = status.to_string();
            row.remarks = remarks.to_string();
        }
    }

    /// Persist the full table, returning the path actually written.
    ///
    /// If the destination cannot be opened (held open by a spreadsheet
    /// viewer, typically) the table goes to a `_temp` sibling instead.
    pub fn flush(&self) -> SuiteResult<PathBuf> {
        match self.write_to(&self.path) {
            Ok(()) => Ok(self.path.clone()),
            Err(err) => {
                let fallback = temp_sibling(&self.path);
                warn!(
                    "cannot write {}: {err}; writing {} instead",
                    self.path.display(),
                    fallback.display()
                );
                self.write_to(&fallback)?;
                Ok(fallback)
            }
        }
    }

    fn write_to(&self, path: &Path) -> SuiteResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// `name.csv` -> `name_temp.csv`, alongside the original.
pub fn temp_sibling(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    path.with_file_name(format!("{stem}_temp.{ext}"))
}

static KEY_RE: Lazy<Regex> = Lazy::new(|| {
    // A key is a word followed by a colon, at the start or after a
    // separator. Values like URLs keep their internal colons.
    Regex::new(r"(?:^|[,;]|\s)\s*([A-Za-z][A-Za-z0-9_]*)\s*:\s*").unwrap()
});

/// Parsed `Key: value` pairs from a free-text `Test Data` field.
///
/// The field is written by hand upstream, so parsing is permissive:
/// pairs may be separated by commas, semicolons or plain whitespace,
/// and key case is not significant. Missing keys read as `""`.
#[derive(Debug, Clone, Default)]
pub struct TestData {
    values: HashMap<String, String>,
}

impl TestData {
    pub fn parse(raw: &str) -> Self {
        let mut values = HashMap::new();
        let matches: Vec<_> = KEY_RE.captures_iter(raw).collect();
        for (i, cap) in matches.iter().enumerate() {
            let key = cap[1].to_ascii_lowercase();
            let start = cap.get(0).map(|m| m.end()).unwrap_or(0);
            let end = matches
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(raw.len());
            let value = raw[start..end]
                .trim()
                .trim_end_matches([',', ';'])
                .trim()
                .to_string();
            values.entry(key).or_insert(value);
        }
        Self { values }
    }

    /// Value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
