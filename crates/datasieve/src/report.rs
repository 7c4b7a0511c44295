//! The assembled profile, issue list and remediation summary for one table.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{DataTable, SourceMetadata};
use crate::schema::{ColumnStatistics, TableSchema};
use crate::transform::RemediatedTable;
use crate::validation::{DuplicateReport, IssueReport, RowIssues};

/// Component outputs a report is assembled from.
#[derive(Debug, Clone)]
pub struct ReportParts {
    pub source: Option<SourceMetadata>,
    pub schema: TableSchema,
    pub statistics: IndexMap<String, ColumnStatistics>,
    /// Parsed values of each numeric column, in row order.
    pub numeric_distributions: IndexMap<String, Vec<f64>>,
    pub duplicates: DuplicateReport,
    pub issues: IssueReport,
    pub remediation: RemediatedTable,
}

/// Headline counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Rows in the input table.
    pub processed_rows: usize,
    /// Rows with at least one issue.
    pub failed_rows: usize,
    /// Rows removed by remediation.
    pub dropped_rows: usize,
    /// Rows left after remediation.
    pub output_rows: usize,
    pub duplicate_count: usize,
    pub missing_value_rows: usize,
    pub invalid_email_count: usize,
    pub invalid_date_count: usize,
    pub region_mismatch_count: usize,
}

/// Table-level quality percentages, each in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Non-missing cells over all cells.
    pub completeness: f64,
    /// Mean over columns of distinct values over rows.
    pub uniqueness: f64,
    /// Rows with no format or region violation.
    pub validity: f64,
    /// Rows that do not repeat an earlier row.
    pub consistency: f64,
    /// Mean of the four metrics above.
    pub score: f64,
}

impl QualityMetrics {
    fn compute(
        rows: usize,
        statistics: &IndexMap<String, ColumnStatistics>,
        duplicates: &DuplicateReport,
        issues: &IssueReport,
    ) -> Self {
        if rows == 0 {
            return Self {
                completeness: 100.0,
                uniqueness: 100.0,
                validity: 100.0,
                consistency: 100.0,
                score: 100.0,
            };
        }

        let columns = statistics.len();
        let (completeness, uniqueness) = if columns == 0 {
            (100.0, 100.0)
        } else {
            let cells = (rows * columns) as f64;
            let missing: usize = statistics.values().map(|s| s.missing).sum();
            let unique_ratio: f64 = statistics
                .values()
                .map(|s| s.unique as f64 / rows as f64)
                .sum();
            (
                percent(cells - missing as f64, cells),
                unique_ratio / columns as f64 * 100.0,
            )
        };

        let valid_rows = issues
            .rows
            .iter()
            .filter(|r| !r.violations.iter().any(|v| v.kind.is_invalid_value()))
            .count();
        let validity = percent(valid_rows as f64, rows as f64);
        let consistency = percent((rows - duplicates.duplicate_count) as f64, rows as f64);

        Self {
            completeness,
            uniqueness,
            validity,
            consistency,
            score: (completeness + uniqueness + validity + consistency) / 4.0,
        }
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    part / whole * 100.0
}

/// Everything known about one table after profiling and remediation.
///
/// Holds no timestamps or generated ids, so the same table and configuration
/// always serialize to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    pub column_types: TableSchema,
    pub statistics: IndexMap<String, ColumnStatistics>,
    pub missing_values: IndexMap<String, usize>,
    pub numeric_distributions: IndexMap<String, Vec<f64>>,
    pub duplicate_count: usize,
    /// Indices of rows flagged as duplicates.
    pub duplicate_rows: Vec<usize>,
    /// Issue entry for every row, clean or not.
    pub issues: Vec<RowIssues>,
    /// Remediated table, change log and any fill warnings.
    pub remediation: RemediatedTable,
    /// Rows with an issue or touched by remediation, ascending.
    pub faulty_rows: Vec<usize>,
    pub summary: ReportSummary,
    pub quality: QualityMetrics,
}

impl Report {
    /// Package component outputs into a report.
    pub fn assemble(parts: ReportParts) -> Self {
        let ReportParts {
            source,
            schema,
            statistics,
            numeric_distributions,
            duplicates,
            issues,
            remediation,
        } = parts;

        let processed_rows = issues.rows.len();
        let quality = QualityMetrics::compute(processed_rows, &statistics, &duplicates, &issues);

        let faulty_rows: BTreeSet<usize> = issues
            .faulty()
            .map(|r| r.row)
            .chain(remediation.change_log.entries().iter().map(|e| e.row))
            .collect();

        let summary = ReportSummary {
            processed_rows,
            failed_rows: issues.counts.faulty_rows,
            dropped_rows: remediation.dropped_count(),
            output_rows: remediation.table.row_count(),
            duplicate_count: duplicates.duplicate_count,
            missing_value_rows: issues.counts.missing_rows,
            invalid_email_count: issues.counts.invalid_email,
            invalid_date_count: issues.counts.invalid_date,
            region_mismatch_count: issues.counts.region_mismatch,
        };

        Self {
            source,
            column_types: schema,
            statistics,
            missing_values: issues.missing_values,
            numeric_distributions,
            duplicate_count: duplicates.duplicate_count,
            duplicate_rows: duplicates.duplicate_rows().collect(),
            issues: issues.rows,
            remediation,
            faulty_rows: faulty_rows.into_iter().collect(),
            summary,
            quality,
        }
    }

    /// The remediated table.
    pub fn fixed_table(&self) -> &DataTable {
        &self.remediation.table
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataSieve;
    use crate::transform::{DuplicateHandling, MissingValueHandling, RemediationPolicy};
    use crate::SieveConfig;

    fn scenario_a() -> DataTable {
        DataTable::from_strs(
            &["id", "email", "Date_of_birth"],
            &[
                &["1", "a@b.com", "01/02/2020"],
                &["1", "a@b.com", "01/02/2020"],
                &["2", "bad-email", "31/13/2020"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_summary_counters() {
        let report = DataSieve::new().profile(&scenario_a()).unwrap();

        assert_eq!(report.summary.processed_rows, 3);
        assert_eq!(report.summary.failed_rows, 1);
        assert_eq!(report.summary.duplicate_count, 1);
        assert_eq!(report.summary.invalid_email_count, 1);
        assert_eq!(report.summary.invalid_date_count, 1);
        assert_eq!(report.summary.region_mismatch_count, 0);
        assert_eq!(report.duplicate_rows, vec![1]);
        assert_eq!(report.issues[2].issues, "Invalid email format. Invalid date format.");
    }

    #[test]
    fn test_faulty_rows_union() {
        let config = SieveConfig::new().with_policy(RemediationPolicy::new(
            DuplicateHandling::Drop,
            MissingValueHandling::DropRow,
        ));
        let report = DataSieve::with_config(config).profile(&scenario_a()).unwrap();

        // row 1 dropped as duplicate, row 2 has format issues
        assert_eq!(report.faulty_rows, vec![1, 2]);
        assert_eq!(report.summary.dropped_rows, 1);
        assert_eq!(report.summary.output_rows, 2);
    }

    #[test]
    fn test_quality_metrics() {
        let report = DataSieve::new().profile(&scenario_a()).unwrap();
        let q = &report.quality;

        assert_eq!(q.completeness, 100.0);
        assert!((q.validity - 200.0 / 3.0).abs() < 1e-9);
        assert!((q.consistency - 200.0 / 3.0).abs() < 1e-9);
        // each column has 2 distinct values over 3 rows
        assert!((q.uniqueness - 200.0 / 3.0).abs() < 1e-9);
        let mean = (q.completeness + q.uniqueness + q.validity + q.consistency) / 4.0;
        assert!((q.score - mean).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_scores_full() {
        let table = DataTable::from_strs(&["a", "b"], &[]).unwrap();
        let report = DataSieve::new().profile(&table).unwrap();

        assert_eq!(report.quality.score, 100.0);
        assert_eq!(report.summary.processed_rows, 0);
        assert!(report.faulty_rows.is_empty());
    }

    #[test]
    fn test_json_is_stable() {
        let sieve = DataSieve::new();
        let first = sieve.profile(&scenario_a()).unwrap().to_json_pretty().unwrap();
        let second = sieve.profile(&scenario_a()).unwrap().to_json_pretty().unwrap();
        assert_eq!(first, second);

        let parsed: Report = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed.duplicate_count, 1);
    }

    #[test]
    fn test_fill_warnings_serialized_once() {
        let table = DataTable::from_strs(
            &["id", "city"],
            &[&["1", "Oran"], &["2", ""]],
        )
        .unwrap();
        let config = SieveConfig::new().with_policy(RemediationPolicy::new(
            DuplicateHandling::Keep,
            MissingValueHandling::FillMean,
        ));
        let report = DataSieve::with_config(config).profile(&table).unwrap();
        assert_eq!(report.remediation.warnings.len(), 1);

        let json = report.to_json_pretty().unwrap();
        assert_eq!(json.matches("\"warnings\"").count(), 1);

        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
