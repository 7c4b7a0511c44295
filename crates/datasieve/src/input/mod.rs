//! Input parsing and table representation.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig, write_delimited, write_delimited_file};
pub use source::{DataTable, Row, SourceMetadata};
