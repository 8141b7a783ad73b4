mod args;
mod error;
mod logger;
mod schema;

pub use args::CliArgs;
pub use error::SiftError;
pub use logger::setup_logging;
pub use schema::{ColumnMeta, QueryResult, Row, TableSummary};
