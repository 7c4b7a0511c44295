//! Remediation: applying a duplicate/missing-value policy to a table.

mod engine;
mod operations;

pub use engine::{RemediationEngine, RemediationInput};
pub use operations::{
    ChangeEntry, ChangeLog, ChangeReason, ConfigurationWarning, DuplicateHandling, FieldFill,
    MissingValueHandling, RemediatedTable, RemediationPolicy,
};
