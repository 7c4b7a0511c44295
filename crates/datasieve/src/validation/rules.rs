//! Row-level field rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::violation::Violation;
use crate::config::{RegionRule, SieveConfig};
use crate::input::{DataTable, Row};

/// local-part @ domain-labels . tld, where parts are ASCII word characters
/// optionally separated by a single `.` or `-`.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*\.[A-Za-z]{2,3}$",
    )
    .expect("valid email regex")
});

/// `DD/MM/YYYY` with day 01-31 and month 01-12.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/[0-9]{4}$").expect("valid date regex")
});

/// Returns true if `value` is a syntactically valid email address.
///
/// The whole field must match; surrounding whitespace makes it invalid.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Returns true if `value` is written as `DD/MM/YYYY`.
///
/// Day and month ranges are checked field by field; whether the day exists in
/// that month is not, so `31/02/2024` passes.
pub fn is_valid_date(value: &str) -> bool {
    DATE_PATTERN.is_match(value)
}

/// Compare a region code with the expected one.
///
/// Codes match when equal after trimming, or when both are integers of the
/// same value (`1` matches `01`).
fn codes_match(actual: &str, expected: &str) -> bool {
    let (actual, expected) = (actual.trim(), expected.trim());
    if actual == expected {
        return true;
    }
    match (actual.parse::<u32>(), expected.parse::<u32>()) {
        (Ok(a), Ok(e)) => a == e,
        _ => false,
    }
}

/// A stateless rule evaluated against one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// Every column must have a value.
    RequiredField,
    /// The column must hold an email address.
    EmailFormat { column: String },
    /// The column must hold a `DD/MM/YYYY` date.
    DateFormat { column: String },
    /// The region code must match the expected code for the region name.
    RegionCodeConsistency(RegionRule),
}

impl ValidationRule {
    /// Run the rule against a row.
    ///
    /// Missing fields are only ever reported by `RequiredField`; format and
    /// consistency rules skip them.
    pub fn evaluate(&self, row: &Row<'_>) -> Vec<Violation> {
        match self {
            ValidationRule::RequiredField => row
                .fields()
                .filter(|(_, value)| DataTable::is_missing(value))
                .map(|(column, _)| Violation::missing(column))
                .collect(),

            ValidationRule::EmailFormat { column } => match present(row, column) {
                Some(value) if !is_valid_email(value) => vec![Violation::invalid_email(column)],
                _ => Vec::new(),
            },

            ValidationRule::DateFormat { column } => match present(row, column) {
                Some(value) if !is_valid_date(value) => vec![Violation::invalid_date(column)],
                _ => Vec::new(),
            },

            ValidationRule::RegionCodeConsistency(rule) => {
                let (Some(region), Some(code)) =
                    (present(row, &rule.name_column), present(row, &rule.code_column))
                else {
                    return Vec::new();
                };
                match rule.expected_code(region) {
                    Some(expected) if !codes_match(code, expected) => {
                        vec![Violation::region_mismatch(&rule.code_column, region.trim())]
                    }
                    _ => Vec::new(),
                }
            }
        }
    }
}

/// Non-missing value of a column.
fn present<'a>(row: &Row<'a>, column: &str) -> Option<&'a str> {
    row.get(column).filter(|v| !DataTable::is_missing(v))
}

/// The ordered set of rules applied to every row.
///
/// Order is fixed: required fields, region consistency, email, date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<ValidationRule>,
}

impl RuleSet {
    /// Create a rule set from explicit rules, evaluated in the given order.
    pub fn new(rules: Vec<ValidationRule>) -> Self {
        Self { rules }
    }

    /// Build the canonical rule set for a table.
    ///
    /// Email and date rules are only added when their bound column exists.
    pub fn from_config(config: &SieveConfig, table: &DataTable) -> Self {
        let has = |column: &Option<String>| {
            column
                .as_deref()
                .filter(|c| table.column_index(c).is_some())
                .map(str::to_string)
        };

        let mut rules = vec![ValidationRule::RequiredField];
        if let Some(region) = &config.region {
            rules.push(ValidationRule::RegionCodeConsistency(region.clone()));
        }
        if let Some(column) = has(&config.fields.email) {
            rules.push(ValidationRule::EmailFormat { column });
        }
        if let Some(column) = has(&config.fields.date) {
            rules.push(ValidationRule::DateFormat { column });
        }
        Self { rules }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Evaluate every rule against a row, concatenating violations in order.
    pub fn evaluate(&self, row: &Row<'_>) -> Vec<Violation> {
        self.rules.iter().flat_map(|rule| rule.evaluate(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationKind;

    fn table(headers: &[&str], row: &[&str]) -> DataTable {
        DataTable::from_strs(headers, &[row]).unwrap()
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last-name@mail.example.org"));
        assert!(is_valid_email("user_1@domain.dz"));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b.info"));
        assert!(!is_valid_email("a..b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email(" a@b.com"));
        assert!(!is_valid_email("a@b.com "));
        assert!(!is_valid_email("é@b.com"));
        assert!(!is_valid_email("a@dömain.com"));
    }

    #[test]
    fn test_date_shape() {
        assert!(is_valid_date("01/02/2020"));
        assert!(is_valid_date("31/02/2024"));
        assert!(!is_valid_date("31/13/2020"));
        assert!(!is_valid_date("00/10/2020"));
        assert!(!is_valid_date("1/2/2020"));
        assert!(!is_valid_date("2020-01-02"));
        assert!(!is_valid_date(" 01/02/2020"));
    }

    #[test]
    fn test_required_field_in_column_order() {
        let t = table(&["id", "email", "city", "zip"], &["", "x@y.com", "", " "]);
        let violations = ValidationRule::RequiredField.evaluate(&t.row(0).unwrap());
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["Missing id.", "Missing city."]);
    }

    #[test]
    fn test_whitespace_email_is_a_format_error() {
        let t = table(&["id", "email"], &["1", " "]);
        let rules = RuleSet::from_config(&SieveConfig::default(), &t);
        let messages: Vec<_> = rules
            .evaluate(&t.row(0).unwrap())
            .into_iter()
            .map(|v| v.message)
            .collect();
        assert_eq!(messages, vec!["Invalid email format."]);
    }

    #[test]
    fn test_missing_email_is_not_a_format_error() {
        let t = table(&["email"], &[""]);
        let rule = ValidationRule::EmailFormat {
            column: "email".to_string(),
        };
        assert!(rule.evaluate(&t.row(0).unwrap()).is_empty());
    }

    #[test]
    fn test_region_consistency() {
        let rule = ValidationRule::RegionCodeConsistency(
            RegionRule::new("state", "num_state").with_code("Adrar", "01"),
        );

        let bad = table(&["state", "num_state"], &["Adrar", "02"]);
        let violations = rule.evaluate(&bad.row(0).unwrap());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::RegionMismatch);
        assert_eq!(violations[0].message, "Incorrect region number for Adrar.");

        let unknown = table(&["state", "num_state"], &["Atlantis", "99"]);
        assert!(rule.evaluate(&unknown.row(0).unwrap()).is_empty());

        let unpadded = table(&["state", "num_state"], &["Adrar", "1"]);
        assert!(rule.evaluate(&unpadded.row(0).unwrap()).is_empty());

        let no_code = table(&["state", "num_state"], &["Adrar", ""]);
        assert!(rule.evaluate(&no_code.row(0).unwrap()).is_empty());
    }

    #[test]
    fn test_rule_set_order() {
        let t = table(
            &["state", "num_state", "email", "Date_of_birth", "note"],
            &["Adrar", "05", "nope", "2020/01/01", ""],
        );
        let config = SieveConfig::new()
            .with_region(RegionRule::new("state", "num_state").with_code("Adrar", "01"));
        let rules = RuleSet::from_config(&config, &t);
        let messages: Vec<_> = rules
            .evaluate(&t.row(0).unwrap())
            .into_iter()
            .map(|v| v.message)
            .collect();

        assert_eq!(
            messages,
            vec![
                "Missing note.",
                "Incorrect region number for Adrar.",
                "Invalid email format.",
                "Invalid date format.",
            ]
        );
    }

    #[test]
    fn test_rule_set_skips_absent_bindings() {
        let t = table(&["id"], &["1"]);
        let rules = RuleSet::from_config(&SieveConfig::default(), &t);
        assert_eq!(rules.rules(), &[ValidationRule::RequiredField]);
    }
}
