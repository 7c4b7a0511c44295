//! Table-level schema: the inferred type of every column.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::ColumnType;

/// Inferred column types, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: IndexMap<String, ColumnType>,
}

impl TableSchema {
    /// Create a new empty table schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A repeated name overwrites the earlier entry in place.
    pub fn insert(&mut self, name: impl Into<String>, column_type: ColumnType) {
        self.columns.insert(name.into(), column_type);
    }

    /// Type of a column by name.
    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    /// Returns true if the named column is numeric.
    pub fn is_numeric(&self, name: &str) -> bool {
        self.get(name).is_some_and(|t| t.is_numeric())
    }

    /// Iterate over (name, type) pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns.iter().map(|(n, t)| (n.as_str(), *t))
    }

    /// Names of the numeric columns, in header order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, t)| t.is_numeric()).map(|(n, _)| n)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

impl FromIterator<(String, ColumnType)> for TableSchema {
    fn from_iter<I: IntoIterator<Item = (String, ColumnType)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
