//! Row validation: field rules, duplicate detection and issue composition.

mod duplicates;
mod issues;
mod rules;
mod violation;

pub use duplicates::{DuplicateDetector, DuplicateReport, detect_duplicates};
pub use issues::{ISSUE_SEPARATOR, IssueComposer, IssueCounts, IssueReport, RowIssues};
pub use rules::{RuleSet, ValidationRule, is_valid_date, is_valid_email};
pub use violation::{Violation, ViolationKind};
