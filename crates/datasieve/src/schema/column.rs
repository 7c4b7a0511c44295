//! Per-column statistics.

use serde::{Deserialize, Serialize};

/// Statistics computed for a column of any type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Number of non-missing values.
    pub count: usize,
    /// Number of missing values.
    pub missing: usize,
    /// Number of distinct non-missing values.
    pub unique: usize,
    /// Most frequent non-missing value (earliest seen wins ties).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    /// Occurrences of `top`.
    pub freq: usize,
    /// Numeric statistics (for numeric columns).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStatistics>,
}

/// Descriptive statistics for numeric columns.
///
/// Serialized with the conventional `describe()` keys so presentation code
/// can render them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    /// Number of values that parsed as numbers.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 when `count <= 1`.
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

impl NumericStatistics {
    /// The median (50th percentile).
    pub fn median(&self) -> f64 {
        self.p50
    }
}
