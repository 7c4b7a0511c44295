//! Column type inference by majority vote.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::input::DataTable;
use crate::schema::{ColumnType, TableSchema};

/// `DD/MM/YYYY`, digits only.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid date regex"));

/// Parse a field as a finite number.
///
/// Accepts integer and floating-point forms (including exponents); `inf`
/// and `NaN` spellings are rejected.
pub fn parse_numeric(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a field as a `DD/MM/YYYY` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if !DATE_SHAPE.is_match(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}

/// Classifies each column as numeric, date or categorical.
#[derive(Debug, Clone)]
pub struct TypeInferencer {
    /// Fraction of non-missing values a type must strictly exceed.
    majority: f64,
}

impl TypeInferencer {
    /// Create an inferencer using a simple majority (> 50%).
    pub fn new() -> Self {
        Self { majority: 0.5 }
    }

    /// Infer the type of a single column from its raw values.
    ///
    /// Each non-missing value votes for the first type it parses as
    /// (numeric, then date). A type wins when its votes exceed the majority
    /// of non-missing values; numeric is checked before date. Columns with no
    /// values, or no winner, are categorical.
    pub fn infer_type<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> ColumnType {
        let mut present = 0usize;
        let mut numeric = 0usize;
        let mut date = 0usize;

        for value in values {
            if DataTable::is_missing(value) {
                continue;
            }
            present += 1;

            if parse_numeric(value).is_some() {
                numeric += 1;
            } else if parse_date(value).is_some() {
                date += 1;
            } else {
                trace!(value, "value did not parse as numeric or date");
            }
        }

        if present == 0 {
            return ColumnType::Categorical;
        }

        let threshold = present as f64 * self.majority;
        if numeric as f64 > threshold {
            ColumnType::Numeric
        } else if date as f64 > threshold {
            ColumnType::Date
        } else {
            ColumnType::Categorical
        }
    }

    /// Infer the type of every column of a table.
    pub fn infer_types(&self, table: &DataTable) -> TableSchema {
        let schema: TableSchema = table
            .headers()
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), self.infer_type(table.column_values(idx))))
            .collect();

        debug!(
            columns = schema.column_count(),
            numeric = schema.numeric_columns().count(),
            "inferred column types"
        );
        schema
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer column types with the default majority rule.
pub fn infer_types(table: &DataTable) -> TableSchema {
    TypeInferencer::new().infer_types(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(values: &[&str]) -> ColumnType {
        TypeInferencer::new().infer_type(values.iter().copied())
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42"), Some(42.0));
        assert_eq!(parse_numeric(" -3.5 "), Some(-3.5));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("12a"), None);
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("01/02/2020").is_some());
        assert!(parse_date("1/2/2020").is_none());
        assert!(parse_date("2020-02-01").is_none());
        assert!(parse_date("31/02/2024").is_none());
    }

    #[test]
    fn test_infer_numeric() {
        assert_eq!(infer(&["1", "2.5", "3", "x"]), ColumnType::Numeric);
    }

    #[test]
    fn test_infer_date() {
        assert_eq!(infer(&["01/02/2020", "15/08/1999", "", "n/a"]), ColumnType::Date);
    }

    #[test]
    fn test_exactly_half_is_not_a_majority() {
        assert_eq!(infer(&["1", "2", "a", "b"]), ColumnType::Categorical);
    }

    #[test]
    fn test_empty_column_is_categorical() {
        assert_eq!(infer(&["", "  ", ""]), ColumnType::Categorical);
        assert_eq!(infer(&[]), ColumnType::Categorical);
    }

    #[test]
    fn test_infer_types_keeps_header_order() {
        let table = DataTable::from_strs(
            &["name", "age", "dob"],
            &[&["Ann", "31", "01/01/1990"], &["Bob", "", "02/03/1985"]],
        )
        .unwrap();
        let schema = infer_types(&table);
        let types: Vec<_> = schema.iter().collect();

        assert_eq!(
            types,
            vec![
                ("name", ColumnType::Categorical),
                ("age", ColumnType::Numeric),
                ("dob", ColumnType::Date),
            ]
        );
    }
}
