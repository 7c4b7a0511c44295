//! Table representation and source metadata.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{MalformedTable, Result};

/// Metadata about the source data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// The delimiter used, as a character.
    pub delimiter: char,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
}

impl SourceMetadata {
    /// Create metadata for a file that has been parsed.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        delimiter: u8,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            delimiter: delimiter as char,
            row_count,
            column_count,
        }
    }
}

/// An immutable table of raw string fields.
///
/// Every row holds exactly one value per header column; absent fields are
/// stored as empty strings. Transformations build a new table instead of
/// mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a table, checking that the header is unique and every row
    /// matches its arity.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(MalformedTable::DuplicateColumn(header.clone()).into());
            }
        }

        let expected = headers.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(MalformedTable::ArityMismatch {
                row,
                expected,
                found: values.len(),
            }
            .into());
        }

        Ok(Self { headers, rows })
    }

    /// Convenience constructor from string slices.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Result<Self> {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    /// Build a table from rows already known to match `headers`.
    pub(crate) fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self { headers, rows }
    }

    /// Column names in order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Raw values of one row.
    pub fn row_values(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    /// Name-addressable view of one row.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            index,
            headers: &self.headers,
            values,
        })
    }

    /// Iterate over all rows in original order.
    pub fn iter_rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(|(index, values)| Row {
            index,
            headers: &self.headers,
            values,
        })
    }

    /// New table holding only the given rows, in the order given.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Self::from_parts(self.headers.clone(), rows)
    }

    /// Check if a value represents a missing field.
    ///
    /// Only the empty string is missing; whitespace is a value.
    pub fn is_missing(value: &str) -> bool {
        value.is_empty()
    }
}

/// A borrowed row of a [`DataTable`], addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Position of the row in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of the named column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let position = self.headers.iter().position(|h| h == column)?;
        self.values.get(position).map(|s| s.as_str())
    }

    /// (column, value) pairs in header order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }

    /// Returns true if any field of the row is missing.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| DataTable::is_missing(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SieveError;

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = DataTable::from_strs(&["a", "b"], &[&["1", "2"], &["3"]]).unwrap_err();
        match err {
            SieveError::MalformedTable(MalformedTable::ArityMismatch {
                row,
                expected,
                found,
            }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_new_rejects_duplicate_header() {
        let err = DataTable::from_strs(&["a", "a"], &[]).unwrap_err();
        assert!(err.is_malformed_table());
    }

    #[test]
    fn test_row_view() {
        let table = DataTable::from_strs(&["id", "email"], &[&["1", "a@b.com"], &["2", ""]]).unwrap();
        let row = table.row(1).unwrap();

        assert_eq!(row.index(), 1);
        assert_eq!(row.get("id"), Some("2"));
        assert_eq!(row.get("nope"), None);
        assert!(row.has_missing());
        assert!(!table.row(0).unwrap().has_missing());
    }

    #[test]
    fn test_is_missing() {
        assert!(DataTable::is_missing(""));
        assert!(!DataTable::is_missing("   "));
        assert!(!DataTable::is_missing(" "));
        assert!(!DataTable::is_missing("NA"));
        assert!(!DataTable::is_missing("0"));
    }

    #[test]
    fn test_select_rows_keeps_order() {
        let table = DataTable::from_strs(&["x"], &[&["a"], &["b"], &["c"]]).unwrap();
        let picked = table.select_rows(&[2, 0]);

        assert_eq!(picked.row_count(), 2);
        assert_eq!(picked.get(0, 0), Some("c"));
        assert_eq!(picked.get(1, 0), Some("a"));
        assert_eq!(table.row_count(), 3);
    }
}
