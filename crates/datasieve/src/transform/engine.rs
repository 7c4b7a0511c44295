//! Remediation engine: drops or fills rows according to a policy.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::operations::{
    ChangeLog, ChangeReason, ConfigurationWarning, FieldFill, MissingValueHandling,
    RemediatedTable, RemediationPolicy,
};
use crate::input::DataTable;
use crate::schema::{ColumnStatistics, TableSchema};
use crate::validation::{DuplicateReport, IssueReport};

/// Everything a remediation pass reads, computed beforehand on the original
/// table.
#[derive(Debug, Clone, Copy)]
pub struct RemediationInput<'a> {
    pub table: &'a DataTable,
    pub schema: &'a TableSchema,
    pub statistics: &'a IndexMap<String, ColumnStatistics>,
    pub duplicates: &'a DuplicateReport,
    pub issues: &'a IssueReport,
}

/// Applies a [`RemediationPolicy`] to a table, producing a new table.
#[derive(Debug, Clone, Default)]
pub struct RemediationEngine {
    policy: RemediationPolicy,
}

impl RemediationEngine {
    /// Create an engine for the given policy.
    pub fn new(policy: RemediationPolicy) -> Self {
        Self { policy }
    }

    /// The policy this engine applies.
    pub fn policy(&self) -> RemediationPolicy {
        self.policy
    }

    /// Fill value per numeric column, fixed before any row is processed.
    ///
    /// Columns with missing fields but no numeric values get a warning
    /// instead and stay unfilled.
    fn fill_values(
        &self,
        input: &RemediationInput<'_>,
    ) -> (IndexMap<String, f64>, Vec<ConfigurationWarning>) {
        let strategy = self.policy.missing_value_handling;
        let mut values = IndexMap::new();
        let mut warnings = Vec::new();

        if !strategy.is_fill() {
            return (values, warnings);
        }

        for (column, stats) in input.statistics {
            let numeric = stats
                .numeric
                .as_ref()
                .filter(|_| input.schema.is_numeric(column));

            match numeric {
                Some(numeric) => {
                    let value = match strategy {
                        MissingValueHandling::FillMedian => numeric.median(),
                        _ => numeric.mean,
                    };
                    values.insert(column.clone(), value);
                }
                None if stats.missing > 0 => {
                    let message = format!(
                        "column '{}' is not numeric; {} left {} missing field(s) unfilled",
                        column,
                        strategy.label(),
                        stats.missing
                    );
                    warn!(column = %column, strategy = strategy.label(), "{}", message);
                    warnings.push(ConfigurationWarning {
                        column: column.clone(),
                        strategy,
                        message,
                    });
                }
                None => {}
            }
        }

        debug!(columns = values.len(), strategy = strategy.label(), "fixed fill values");
        (values, warnings)
    }

    /// Run the policy over every row in original order.
    ///
    /// Per row: drop if it is a duplicate and duplicates are dropped; else drop
    /// if it has a missing field and the strategy is `drop_row`; else fill its
    /// missing numeric fields when a fill strategy is set; else keep it as is.
    ///
    /// When duplicates are dropped, a filled row whose key now equals a row
    /// already kept is dropped as a duplicate too, so the output never holds
    /// two rows with the same key.
    pub fn apply(&self, input: RemediationInput<'_>) -> RemediatedTable {
        let (fill_values, warnings) = self.fill_values(&input);
        let table = input.table;
        let drop_duplicates = self.policy.duplicate_handling == super::DuplicateHandling::Drop;
        let strategy = self.policy.missing_value_handling;

        let key_positions: Vec<usize> = input
            .duplicates
            .key
            .iter()
            .filter_map(|column| table.column_index(column))
            .collect();
        let mut kept_keys: HashSet<Vec<String>> = HashSet::new();

        let mut change_log = ChangeLog::new();
        let mut kept_rows = Vec::with_capacity(table.row_count());
        let mut rows = Vec::with_capacity(table.row_count());

        for row in table.iter_rows() {
            let idx = row.index();
            let has_missing = input
                .issues
                .row(idx)
                .map_or_else(|| row.has_missing(), |issues| issues.has_missing());

            if drop_duplicates && input.duplicates.is_duplicate(idx) {
                change_log.push(idx, ChangeReason::DroppedDuplicate);
                continue;
            }

            if strategy == MissingValueHandling::DropRow && has_missing {
                change_log.push(idx, ChangeReason::DroppedMissing);
                continue;
            }

            let mut values: Vec<String> = row.fields().map(|(_, v)| v.to_string()).collect();
            let mut fills = Vec::new();
            if has_missing && strategy.is_fill() {
                for (pos, (column, value)) in row.fields().enumerate() {
                    if !DataTable::is_missing(value) {
                        continue;
                    }
                    if let Some(fill) = fill_values.get(column) {
                        let text = format_fill(*fill);
                        values[pos] = text.clone();
                        fills.push(FieldFill {
                            column: column.to_string(),
                            value: text,
                        });
                    }
                }
            }

            if drop_duplicates {
                let key: Vec<String> = key_positions.iter().map(|&p| values[p].clone()).collect();
                if !kept_keys.insert(key) {
                    debug!(row = idx, "row repeats a kept key after filling");
                    change_log.push(idx, ChangeReason::DroppedDuplicate);
                    continue;
                }
            }

            if !fills.is_empty() {
                change_log.push(idx, ChangeReason::Filled { fills });
            }
            kept_rows.push(idx);
            rows.push(values);
        }

        info!(
            input_rows = table.row_count(),
            output_rows = rows.len(),
            dropped = change_log.dropped_count(),
            "remediation complete"
        );

        RemediatedTable {
            policy: self.policy,
            table: DataTable::from_parts(table.headers().to_vec(), rows),
            kept_rows,
            change_log,
            fill_values,
            warnings,
        }
    }
}

/// Render a fill value as a field, using the shortest exact form (`20`, `2.5`).
fn format_fill(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SieveConfig;
    use crate::inference::{compute_statistics, infer_types};
    use crate::transform::DuplicateHandling;
    use crate::validation::{IssueComposer, RuleSet, detect_duplicates};

    fn remediate(table: &DataTable, policy: RemediationPolicy) -> RemediatedTable {
        let schema = infer_types(table);
        let statistics = compute_statistics(table, &schema);
        let duplicates = detect_duplicates(table, None).unwrap();
        let issues = IssueComposer::new(RuleSet::from_config(&SieveConfig::default(), table))
            .compose(table);

        RemediationEngine::new(policy).apply(RemediationInput {
            table,
            schema: &schema,
            statistics: &statistics,
            duplicates: &duplicates,
            issues: &issues,
        })
    }

    #[test]
    fn test_fill_mean() {
        let table = DataTable::from_strs(&["x"], &[&["10"], &[""], &["30"]]).unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Keep, MissingValueHandling::FillMean);
        let result = remediate(&table, policy);

        assert_eq!(result.table.row_count(), 3);
        assert_eq!(result.table.get(1, 0), Some("20"));
        assert_eq!(result.fill_values["x"], 20.0);
        assert_eq!(result.change_log.len(), 1);
        assert_eq!(result.change_log.entries()[0].row, 1);
        // original untouched
        assert_eq!(table.get(1, 0), Some(""));
    }

    #[test]
    fn test_fill_median() {
        let table = DataTable::from_strs(&["x"], &[&["1"], &[""], &["2"], &["100"]]).unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Keep, MissingValueHandling::FillMedian);
        let result = remediate(&table, policy);

        assert_eq!(result.table.get(1, 0), Some("2"));
    }

    #[test]
    fn test_drop_duplicates_before_missing() {
        let table = DataTable::from_strs(
            &["id", "v"],
            &[&["1", "a"], &["1", "a"], &["2", ""], &["3", "c"]],
        )
        .unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Drop, MissingValueHandling::DropRow);
        let result = remediate(&table, policy);

        assert_eq!(result.kept_rows, vec![0, 3]);
        let reasons: Vec<_> = result
            .change_log
            .entries()
            .iter()
            .map(|e| (e.row, e.reason.to_string()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (1, "dropped: duplicate".to_string()),
                (2, "dropped: missing".to_string()),
            ]
        );
        assert_eq!(result.faulty_rows(&table).row_count(), 2);
    }

    #[test]
    fn test_fill_that_creates_duplicate_is_dropped() {
        let table = DataTable::from_strs(
            &["id", "score"],
            &[&["1", "20"], &["1", ""], &["2", "20"]],
        )
        .unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Drop, MissingValueHandling::FillMean);
        let result = remediate(&table, policy);

        assert_eq!(result.fill_values["score"], 20.0);
        assert_eq!(result.kept_rows, vec![0, 2]);
        let reasons: Vec<_> = result
            .change_log
            .entries()
            .iter()
            .map(|e| (e.row, e.reason.to_string()))
            .collect();
        assert_eq!(reasons, vec![(1, "dropped: duplicate".to_string())]);

        let again = detect_duplicates(&result.table, None).unwrap();
        assert_eq!(again.duplicate_count, 0);
    }

    #[test]
    fn test_fill_duplicate_kept_when_duplicates_kept() {
        let table = DataTable::from_strs(&["id", "score"], &[&["1", "20"], &["1", ""]]).unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Keep, MissingValueHandling::FillMean);
        let result = remediate(&table, policy);

        assert_eq!(result.kept_rows, vec![0, 1]);
        assert_eq!(result.table.get(1, 1), Some("20"));
    }

    #[test]
    fn test_keep_duplicates() {
        let table = DataTable::from_strs(&["id"], &[&["1"], &["1"]]).unwrap();
        let result = remediate(&table, RemediationPolicy::default());
        assert_eq!(result.table.row_count(), 2);
        assert!(result.change_log.is_empty());
    }

    #[test]
    fn test_text_columns_are_not_filled() {
        let table = DataTable::from_strs(
            &["age", "city"],
            &[&["20", "Oran"], &["", ""], &["40", "Blida"]],
        )
        .unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Keep, MissingValueHandling::FillMean);
        let result = remediate(&table, policy);

        assert_eq!(result.table.get(1, 0), Some("30"));
        assert_eq!(result.table.get(1, 1), Some(""));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].column, "city");
        assert!(result.warnings[0].message.contains("is not numeric"));
    }

    #[test]
    fn test_mostly_numeric_text_column_warning() {
        let table = DataTable::from_strs(
            &["code"],
            &[&["1"], &["2"], &["n/a"], &["tbd"], &[""]],
        )
        .unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Keep, MissingValueHandling::FillMean);
        let result = remediate(&table, policy);

        assert!(result.fill_values.is_empty());
        assert_eq!(
            result.warnings[0].message,
            "column 'code' is not numeric; fill_mean left 1 missing field(s) unfilled"
        );
    }

    #[test]
    fn test_all_empty_column_warns() {
        let table = DataTable::from_strs(&["empty"], &[&[""], &[""]]).unwrap();
        let policy = RemediationPolicy::new(DuplicateHandling::Keep, MissingValueHandling::FillMedian);
        let result = remediate(&table, policy);

        assert_eq!(result.table.row_count(), 2);
        assert!(result.fill_values.is_empty());
        assert_eq!(result.warnings[0].strategy, MissingValueHandling::FillMedian);
        assert!(result.change_log.is_empty());
    }
}
