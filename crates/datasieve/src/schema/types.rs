//! Core type definitions for schema representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inferred value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Integer or floating-point values.
    Numeric,
    /// Dates written as `DD/MM/YYYY`.
    Date,
    /// Anything else, including columns with no values at all.
    #[default]
    Categorical,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Date => "date",
            ColumnType::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
