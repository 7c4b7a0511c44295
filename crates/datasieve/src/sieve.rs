//! Main DataSieve struct and public API.

use std::path::Path;

use indexmap::IndexMap;
use tracing::info;

use crate::config::SieveConfig;
use crate::error::Result;
use crate::inference::{StatisticsAggregator, TypeInferencer};
use crate::input::{DataTable, Parser, SourceMetadata};
use crate::report::{Report, ReportParts};
use crate::schema::TableSchema;
use crate::transform::{RemediatedTable, RemediationEngine, RemediationInput};
use crate::validation::{DuplicateDetector, IssueComposer, IssueReport, RuleSet};

/// The data quality engine.
///
/// Each call works on the table it is given and keeps no state between
/// calls, so one instance can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct DataSieve {
    config: SieveConfig,
}

impl DataSieve {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: SieveConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    /// Read a delimited file and profile it.
    pub fn profile_file(&self, path: impl AsRef<Path>) -> Result<Report> {
        let (table, source) = self.read(path)?;
        self.profile_with_source(&table, Some(source))
    }

    /// Read a delimited file into a table.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        Parser::new().parse_file(path)
    }

    /// Profile, validate and remediate a table in one pass.
    pub fn profile(&self, table: &DataTable) -> Result<Report> {
        self.profile_with_source(table, None)
    }

    fn profile_with_source(
        &self,
        table: &DataTable,
        source: Option<SourceMetadata>,
    ) -> Result<Report> {
        self.config.check_columns(table)?;

        let schema = TypeInferencer::new().infer_types(table);
        let aggregator = StatisticsAggregator::new();
        let statistics = aggregator.compute(table, &schema);
        let numeric_distributions = numeric_distributions(&aggregator, table, &schema);
        let duplicates = DuplicateDetector::with_key(self.config.duplicate_key.clone()).detect(table)?;
        let issues = self.issues(table);

        let remediation = RemediationEngine::new(self.config.policy).apply(RemediationInput {
            table,
            schema: &schema,
            statistics: &statistics,
            duplicates: &duplicates,
            issues: &issues,
        });

        let report = Report::assemble(ReportParts {
            source,
            schema,
            statistics,
            numeric_distributions,
            duplicates,
            issues,
            remediation,
        });

        info!(
            rows = report.summary.processed_rows,
            failed = report.summary.failed_rows,
            duplicates = report.summary.duplicate_count,
            score = report.quality.score,
            "profile complete"
        );
        Ok(report)
    }

    /// Run only the field rules and collect per-row issues.
    pub fn check(&self, table: &DataTable) -> Result<IssueReport> {
        self.config.check_columns(table)?;
        Ok(self.issues(table))
    }

    /// Apply the configured remediation policy, without building a report.
    pub fn remediate(&self, table: &DataTable) -> Result<RemediatedTable> {
        self.config.check_columns(table)?;

        let schema = TypeInferencer::new().infer_types(table);
        let statistics = StatisticsAggregator::new().compute(table, &schema);
        let duplicates = DuplicateDetector::with_key(self.config.duplicate_key.clone()).detect(table)?;
        let issues = self.issues(table);

        Ok(RemediationEngine::new(self.config.policy).apply(RemediationInput {
            table,
            schema: &schema,
            statistics: &statistics,
            duplicates: &duplicates,
            issues: &issues,
        }))
    }

    fn issues(&self, table: &DataTable) -> IssueReport {
        IssueComposer::new(RuleSet::from_config(&self.config, table)).compose(table)
    }
}

fn numeric_distributions(
    aggregator: &StatisticsAggregator,
    table: &DataTable,
    schema: &TableSchema,
) -> IndexMap<String, Vec<f64>> {
    table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, name)| schema.is_numeric(name))
        .map(|(idx, name)| (name.clone(), aggregator.numeric_values(table, idx)))
        .collect()
}
