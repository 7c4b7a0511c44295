//! Merges rule violations into per-row issue text and per-column counts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::RuleSet;
use super::violation::{Violation, ViolationKind};
use crate::input::DataTable;

/// Separator placed between violation messages in a row's issue text.
pub const ISSUE_SEPARATOR: &str = " ";

/// All violations found on one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssues {
    /// Position of the row in the validated table.
    pub row: usize,
    /// Violation messages joined with [`ISSUE_SEPARATOR`]; empty when clean.
    pub issues: String,
    /// Individual violations, in rule order.
    pub violations: Vec<Violation>,
}

impl RowIssues {
    /// Build the issue entry for a row.
    pub fn new(row: usize, violations: Vec<Violation>) -> Self {
        let issues = violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(ISSUE_SEPARATOR);
        Self {
            row,
            issues,
            violations,
        }
    }

    /// Returns true if the row has no violations.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns true if the row has a violation of the given kind.
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Returns true if any field of the row is missing.
    pub fn has_missing(&self) -> bool {
        self.has(ViolationKind::Missing)
    }
}

/// Rows affected by each kind of violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    /// Rows with at least one violation.
    pub faulty_rows: usize,
    /// Rows with at least one missing field.
    pub missing_rows: usize,
    pub invalid_email: usize,
    pub invalid_date: usize,
    pub region_mismatch: usize,
}

/// Output of composing issues over a whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    /// One entry per row, in row order.
    pub rows: Vec<RowIssues>,
    /// Missing field count per column, in header order.
    pub missing_values: IndexMap<String, usize>,
    /// Summary counters.
    pub counts: IssueCounts,
}

impl IssueReport {
    /// Issue entry for a row.
    pub fn row(&self, row: usize) -> Option<&RowIssues> {
        self.rows.get(row)
    }

    /// Entries that have at least one violation.
    pub fn faulty(&self) -> impl Iterator<Item = &RowIssues> {
        self.rows.iter().filter(|r| !r.is_clean())
    }
}

/// Runs a [`RuleSet`] over every row of a table.
#[derive(Debug, Clone)]
pub struct IssueComposer {
    rules: RuleSet,
}

impl IssueComposer {
    /// Create a composer for the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Evaluate every row and aggregate the results.
    pub fn compose(&self, table: &DataTable) -> IssueReport {
        let mut missing_values: IndexMap<String, usize> =
            table.headers().iter().map(|h| (h.clone(), 0)).collect();
        let mut counts = IssueCounts::default();
        let mut rows = Vec::with_capacity(table.row_count());

        for row in table.iter_rows() {
            let entry = RowIssues::new(row.index(), self.rules.evaluate(&row));

            for violation in &entry.violations {
                if violation.kind == ViolationKind::Missing {
                    if let Some(count) = missing_values.get_mut(&violation.column) {
                        *count += 1;
                    }
                }
            }

            if !entry.is_clean() {
                counts.faulty_rows += 1;
            }
            counts.missing_rows += usize::from(entry.has_missing());
            counts.invalid_email += usize::from(entry.has(ViolationKind::InvalidEmail));
            counts.invalid_date += usize::from(entry.has(ViolationKind::InvalidDate));
            counts.region_mismatch += usize::from(entry.has(ViolationKind::RegionMismatch));

            rows.push(entry);
        }

        debug!(
            rows = rows.len(),
            faulty = counts.faulty_rows,
            invalid_email = counts.invalid_email,
            invalid_date = counts.invalid_date,
            region_mismatch = counts.region_mismatch,
            "composed row issues"
        );

        IssueReport {
            rows,
            missing_values,
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SieveConfig;

    fn compose(table: &DataTable) -> IssueReport {
        IssueComposer::new(RuleSet::from_config(&SieveConfig::default(), table)).compose(table)
    }

    #[test]
    fn test_issue_text_joined_in_rule_order() {
        let table = DataTable::from_strs(
            &["id", "email", "Date_of_birth"],
            &[
                &["1", "a@b.com", "01/02/2020"],
                &["2", "bad-email", "31/13/2020"],
                &["3", "", "2020"],
            ],
        )
        .unwrap();
        let report = compose(&table);

        assert!(report.rows[0].is_clean());
        assert_eq!(report.rows[0].issues, "");
        assert_eq!(report.rows[1].issues, "Invalid email format. Invalid date format.");
        assert_eq!(report.rows[2].issues, "Missing email. Invalid date format.");
    }

    #[test]
    fn test_missing_counts_per_column() {
        let table = DataTable::from_strs(
            &["a", "b", "c"],
            &[&["", "1", ""], &["", "2", "x"], &["y", "", "z"]],
        )
        .unwrap();
        let report = compose(&table);

        let counts: Vec<_> = report
            .missing_values
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(counts, vec![("a", 2), ("b", 1), ("c", 1)]);
        assert_eq!(report.counts.missing_rows, 3);
        assert_eq!(report.counts.faulty_rows, 3);
    }

    #[test]
    fn test_counters() {
        let table = DataTable::from_strs(
            &["email", "Date_of_birth"],
            &[&["x", "01/01/2000"], &["y", "bad"], &["ok@mail.com", "01/01/2000"]],
        )
        .unwrap();
        let report = compose(&table);

        assert_eq!(report.counts.invalid_email, 2);
        assert_eq!(report.counts.invalid_date, 1);
        assert_eq!(report.counts.region_mismatch, 0);
        assert_eq!(report.faulty().count(), 2);
    }
}
