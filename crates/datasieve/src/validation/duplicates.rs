//! Duplicate row detection with first-seen-wins semantics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MalformedTable, Result, SieveError};
use crate::input::DataTable;

/// Per-row duplicate flags for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Columns that formed the key, in key order.
    pub key: Vec<String>,
    /// `flags[i]` is true when row `i` repeats the key of an earlier row.
    pub flags: Vec<bool>,
    /// Number of flagged rows.
    pub duplicate_count: usize,
    /// Number of distinct keys seen.
    pub distinct_keys: usize,
}

impl DuplicateReport {
    /// Returns true if the row repeats an earlier row.
    pub fn is_duplicate(&self, row: usize) -> bool {
        self.flags.get(row).copied().unwrap_or(false)
    }

    /// Indices of flagged rows, ascending.
    pub fn duplicate_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(|(idx, _)| idx)
    }
}

/// Flags rows whose key was already seen earlier in the table.
///
/// Keys are compared by exact string equality with no trimming or case
/// folding. Rows whose key fields are all empty share the empty key and are
/// flagged as duplicates of each other.
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    key: Option<Vec<String>>,
}

impl DuplicateDetector {
    /// Detector keyed on every column.
    pub fn new() -> Self {
        Self { key: None }
    }

    /// Detector keyed on the given columns, in order.
    pub fn with_key(key: Option<Vec<String>>) -> Self {
        Self { key }
    }

    /// Resolve the key to column positions.
    fn key_columns(&self, table: &DataTable) -> Result<Vec<(String, usize)>> {
        match &self.key {
            None => Ok(table
                .headers()
                .iter()
                .cloned()
                .enumerate()
                .map(|(idx, name)| (name, idx))
                .collect()),
            Some(columns) => columns
                .iter()
                .map(|name| {
                    table
                        .column_index(name)
                        .map(|idx| (name.clone(), idx))
                        .ok_or_else(|| {
                            SieveError::from(MalformedTable::UnknownColumn {
                                column: name.clone(),
                                context: "duplicate_key".to_string(),
                            })
                        })
                })
                .collect(),
        }
    }

    /// Walk the rows in order and flag repeated keys.
    pub fn detect(&self, table: &DataTable) -> Result<DuplicateReport> {
        let columns = self.key_columns(table)?;
        let mut seen: HashSet<Vec<&str>> = HashSet::with_capacity(table.row_count());
        let mut flags = Vec::with_capacity(table.row_count());

        for row in 0..table.row_count() {
            let key: Vec<&str> = columns
                .iter()
                .map(|(_, idx)| table.get(row, *idx).unwrap_or(""))
                .collect();
            flags.push(!seen.insert(key));
        }

        let duplicate_count = flags.iter().filter(|f| **f).count();
        debug!(
            rows = table.row_count(),
            duplicates = duplicate_count,
            "detected duplicate rows"
        );

        Ok(DuplicateReport {
            key: columns.into_iter().map(|(name, _)| name).collect(),
            flags,
            duplicate_count,
            distinct_keys: seen.len(),
        })
    }
}

/// Detect duplicates using an optional explicit key.
pub fn detect_duplicates(table: &DataTable, key: Option<&[String]>) -> Result<DuplicateReport> {
    DuplicateDetector::with_key(key.map(<[String]>::to_vec)).detect(table)
}
