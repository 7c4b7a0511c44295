//! DataSieve: a data quality engine for tabular datasets.
//!
//! DataSieve profiles a delimited table, validates its rows against a fixed
//! set of field rules and produces a remediated copy according to a policy.
//!
//! # Pipeline
//!
//! - **Profile**: infer a type for every column and compute descriptive
//!   statistics
//! - **Validate**: flag duplicate rows and collect per-row issues (missing
//!   fields, malformed emails and dates, region code mismatches)
//! - **Remediate**: drop duplicates, then drop or fill rows with missing
//!   fields, recording every change in a change log
//!
//! The input table is never modified; every step produces new values.
//!
//! # Example
//!
//! ```no_run
//! use datasieve::DataSieve;
//!
//! let sieve = DataSieve::new();
//! let report = sieve.profile_file("people.csv").unwrap();
//!
//! println!("Rows: {}", report.summary.processed_rows);
//! println!("Duplicates: {}", report.duplicate_count);
//! ```

pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod report;
pub mod schema;
pub mod transform;
pub mod validation;

mod sieve;

pub use crate::sieve::DataSieve;
pub use config::{FieldBindings, RegionRule, SieveConfig};
pub use error::{MalformedTable, Result, SieveError};
pub use input::{DataTable, SourceMetadata};
pub use report::{QualityMetrics, Report, ReportSummary};
pub use schema::{ColumnStatistics, ColumnType, NumericStatistics, TableSchema};
pub use transform::{
    ChangeLog, DuplicateHandling, MissingValueHandling, RemediatedTable, RemediationPolicy,
};
pub use validation::{RowIssues, Violation, ViolationKind};
