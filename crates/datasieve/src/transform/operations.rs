//! Remediation policy and the records a remediation pass produces.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// What to do with rows flagged as duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateHandling {
    /// Leave duplicates in the output.
    #[default]
    Keep,
    /// Remove every duplicate after the first occurrence.
    Drop,
}

/// What to do with rows that have missing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueHandling {
    /// Remove any row with a missing field.
    #[default]
    DropRow,
    /// Fill missing numeric fields with the column mean.
    FillMean,
    /// Fill missing numeric fields with the column median.
    FillMedian,
}

impl MissingValueHandling {
    /// Returns true for the fill strategies.
    pub fn is_fill(&self) -> bool {
        matches!(self, MissingValueHandling::FillMean | MissingValueHandling::FillMedian)
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MissingValueHandling::DropRow => "drop_row",
            MissingValueHandling::FillMean => "fill_mean",
            MissingValueHandling::FillMedian => "fill_median",
        }
    }
}

/// Duplicate and missing-value handling applied in one remediation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemediationPolicy {
    pub duplicate_handling: DuplicateHandling,
    pub missing_value_handling: MissingValueHandling,
}

impl RemediationPolicy {
    /// Create a policy.
    pub fn new(
        duplicate_handling: DuplicateHandling,
        missing_value_handling: MissingValueHandling,
    ) -> Self {
        Self {
            duplicate_handling,
            missing_value_handling,
        }
    }
}

/// A value substituted for a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFill {
    /// Column that was filled.
    pub column: String,
    /// Value written into the field.
    pub value: String,
}

/// Why a row appears in the change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChangeReason {
    /// Dropped because it repeats an earlier row.
    DroppedDuplicate,
    /// Dropped because a field is missing.
    DroppedMissing,
    /// Kept, with missing numeric fields filled.
    Filled { fills: Vec<FieldFill> },
}

impl ChangeReason {
    /// Returns true if the row was removed.
    pub fn is_drop(&self) -> bool {
        matches!(self, ChangeReason::DroppedDuplicate | ChangeReason::DroppedMissing)
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeReason::DroppedDuplicate => f.write_str("dropped: duplicate"),
            ChangeReason::DroppedMissing => f.write_str("dropped: missing"),
            ChangeReason::Filled { fills } => {
                let columns: Vec<&str> = fills.iter().map(|fill| fill.column.as_str()).collect();
                write!(f, "filled: {}", columns.join(", "))
            }
        }
    }
}

/// One dropped or altered row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Index of the row in the original table.
    pub row: usize,
    /// What happened to it.
    #[serde(flatten)]
    pub reason: ChangeReason,
}

/// Every row a remediation pass dropped or altered, in original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    /// Create an empty change log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change.
    pub fn push(&mut self, row: usize, reason: ChangeReason) {
        self.entries.push(ChangeEntry { row, reason });
    }

    /// All entries.
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original indices of dropped rows.
    pub fn dropped_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().filter(|e| e.reason.is_drop()).map(|e| e.row)
    }

    /// Original indices of rows kept with filled values.
    pub fn filled_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().filter(|e| !e.reason.is_drop()).map(|e| e.row)
    }

    /// Number of dropped rows.
    pub fn dropped_count(&self) -> usize {
        self.dropped_rows().count()
    }

    /// Number of rows dropped as duplicates.
    pub fn duplicate_drops(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.reason == ChangeReason::DroppedDuplicate)
            .count()
    }
}

/// A fill strategy could not be applied to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationWarning {
    /// Column that was left unfilled.
    pub column: String,
    /// Strategy that was requested.
    pub strategy: MissingValueHandling,
    /// Human-readable explanation.
    pub message: String,
}

/// Output of a remediation pass: a new table plus what changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediatedTable {
    /// Policy that produced this table.
    pub policy: RemediationPolicy,
    /// The remediated rows.
    pub table: DataTable,
    /// `kept_rows[i]` is the original index of output row `i`.
    pub kept_rows: Vec<usize>,
    /// Dropped and altered rows.
    pub change_log: ChangeLog,
    /// Fill value used for each numeric column.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fill_values: IndexMap<String, f64>,
    /// Columns a fill strategy could not be applied to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConfigurationWarning>,
}

impl RemediatedTable {
    /// Rows of `original` that were dropped or altered, in original order.
    pub fn faulty_rows(&self, original: &DataTable) -> DataTable {
        let rows: Vec<usize> = self.change_log.entries().iter().map(|e| e.row).collect();
        original.select_rows(&rows)
    }

    /// Number of rows removed.
    pub fn dropped_count(&self) -> usize {
        self.change_log.dropped_count()
    }
}
