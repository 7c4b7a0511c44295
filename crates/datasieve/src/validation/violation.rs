//! Violation types produced by the field rules.

use serde::{Deserialize, Serialize};

/// Kind of rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A field is empty or absent.
    Missing,
    /// The email field does not look like an address.
    InvalidEmail,
    /// The date field is not `DD/MM/YYYY`.
    InvalidDate,
    /// The region code disagrees with the region name.
    RegionMismatch,
}

impl ViolationKind {
    /// Get a human-readable label for the violation kind.
    pub fn label(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "Missing Value",
            ViolationKind::InvalidEmail => "Invalid Email",
            ViolationKind::InvalidDate => "Invalid Date",
            ViolationKind::RegionMismatch => "Region Mismatch",
        }
    }

    /// Returns true for format/consistency problems, as opposed to absence.
    pub fn is_invalid_value(&self) -> bool {
        !matches!(self, ViolationKind::Missing)
    }
}

/// One rule violation on one field of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of problem.
    pub kind: ViolationKind,
    /// Column the violation is attached to.
    pub column: String,
    /// Human-readable message, ending with a period.
    pub message: String,
}

impl Violation {
    /// `Missing <column>.`
    pub fn missing(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            kind: ViolationKind::Missing,
            message: format!("Missing {}.", column),
            column,
        }
    }

    /// `Invalid email format.`
    pub fn invalid_email(column: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::InvalidEmail,
            column: column.into(),
            message: "Invalid email format.".to_string(),
        }
    }

    /// `Invalid date format.`
    pub fn invalid_date(column: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::InvalidDate,
            column: column.into(),
            message: "Invalid date format.".to_string(),
        }
    }

    /// `Incorrect region number for <region>.`
    pub fn region_mismatch(column: impl Into<String>, region: &str) -> Self {
        Self {
            kind: ViolationKind::RegionMismatch,
            column: column.into(),
            message: format!("Incorrect region number for {}.", region),
        }
    }
}
