//! Type inference and descriptive statistics.

mod statistical;
mod type_inference;

pub use statistical::{StatisticsAggregator, compute_statistics, numeric_statistics, percentile};
pub use type_inference::{TypeInferencer, infer_types, parse_date, parse_numeric};
