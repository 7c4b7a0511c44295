//! Descriptive statistics over the columns of a table.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::type_inference::parse_numeric;
use crate::input::DataTable;
use crate::schema::{ColumnStatistics, NumericStatistics, TableSchema};

/// Pick the element at rank `round(p * (n - 1))` of an ascending slice.
///
/// No interpolation is done, so the result is always one of the inputs.
/// Halfway ranks round away from zero. Returns 0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Compute count, mean, sample std, min, quartiles and max.
///
/// Returns `None` when there are no values. The standard deviation uses an
/// `n - 1` denominator and is exactly 0 when there is a single value.
///
/// Mean and std stay finite for any finite input, even when the plain sums
/// would overflow.
pub fn numeric_statistics(values: &[f64]) -> Option<NumericStatistics> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = mean(values);
    let std = if count <= 1 { 0.0 } else { sample_std(values, mean) };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(NumericStatistics {
        count,
        mean,
        std,
        min: sorted[0],
        p25: percentile(&sorted, 0.25),
        p50: percentile(&sorted, 0.50),
        p75: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Largest magnitude in `values`, used to bring sums back into range.
fn magnitude(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let plain = values.iter().sum::<f64>() / n;
    if plain.is_finite() {
        return plain;
    }

    let scale = magnitude(values);
    trace!(scale, "sum overflowed, using scaled mean");
    scale * (values.iter().map(|v| v / scale).sum::<f64>() / n)
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    let dof = (values.len() - 1) as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let plain = (sum_sq / dof).sqrt();
    if plain.is_finite() {
        return plain;
    }

    let scale = magnitude(values);
    let scaled_mean = mean / scale;
    let sum_sq: f64 = values.iter().map(|v| (v / scale - scaled_mean).powi(2)).sum();
    // the spread of values near f64::MAX can itself exceed it
    (scale * (sum_sq / dof).sqrt()).min(f64::MAX)
}

/// Computes per-column statistics from scratch on every call.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator;

impl StatisticsAggregator {
    /// Create a new aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Parsed non-missing numeric values of a column, in row order.
    ///
    /// Fields that do not parse are skipped.
    pub fn numeric_values(&self, table: &DataTable, col_index: usize) -> Vec<f64> {
        table
            .column_values(col_index)
            .filter(|v| !DataTable::is_missing(v))
            .filter_map(|v| {
                let parsed = parse_numeric(v);
                if parsed.is_none() {
                    trace!(value = v, column = col_index, "skipping non-numeric field");
                }
                parsed
            })
            .collect()
    }

    /// Statistics for one column.
    pub fn analyze_column(&self, table: &DataTable, col_index: usize, numeric: bool) -> ColumnStatistics {
        let mut value_counts: IndexMap<&str, usize> = IndexMap::new();
        let mut missing = 0;

        for value in table.column_values(col_index) {
            if DataTable::is_missing(value) {
                missing += 1;
            } else {
                *value_counts.entry(value).or_insert(0) += 1;
            }
        }

        let mut top: Option<(&str, usize)> = None;
        for (&value, &count) in &value_counts {
            if top.is_none_or(|(_, best)| count > best) {
                top = Some((value, count));
            }
        }

        let numeric = if numeric {
            numeric_statistics(&self.numeric_values(table, col_index))
        } else {
            None
        };

        ColumnStatistics {
            count: table.row_count() - missing,
            missing,
            unique: value_counts.len(),
            top: top.map(|(v, _)| v.to_string()),
            freq: top.map(|(_, c)| c).unwrap_or(0),
            numeric,
        }
    }

    /// Statistics for every column, keyed by name in header order.
    pub fn compute(&self, table: &DataTable, schema: &TableSchema) -> IndexMap<String, ColumnStatistics> {
        let stats: IndexMap<String, ColumnStatistics> = table
            .headers()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let numeric = schema.is_numeric(name);
                (name.clone(), self.analyze_column(table, idx, numeric))
            })
            .collect();

        debug!(
            columns = stats.len(),
            missing = stats.values().map(|s| s.missing).sum::<usize>(),
            "computed column statistics"
        );
        stats
    }
}

/// Compute statistics for every column of a table.
pub fn compute_statistics(table: &DataTable, schema: &TableSchema) -> IndexMap<String, ColumnStatistics> {
    StatisticsAggregator::new().compute(table, schema)
}
