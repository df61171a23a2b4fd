//! Tabular data: values, the column-oriented table, loading, statistics
//! and writing.

mod frame;
mod loader;
mod source;
mod stats;
mod value;
mod writer;

pub use frame::Table;
pub use loader::{is_null_token, LoaderConfig, TableLoader};
pub use source::SourceMetadata;
pub use stats::{
    consistency_issues, median, numeric_values, ColumnStatistics, ConsistencyColumns,
    ConsistencyIssue, NumericStatistics, TableInfo,
};
pub use value::{ColumnType, Value};
