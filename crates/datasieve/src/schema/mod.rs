//! Schema types: column types and column statistics.

mod column;
mod table;
mod types;

pub use column::{ColumnStatistics, NumericStatistics};
pub use table::TableSchema;
pub use types::ColumnType;
