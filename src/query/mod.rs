//! Read-only ad-hoc queries against a workspace's table.

mod normalize;
mod validate;

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::core::{ColumnMeta, QueryResult, SiftError};
use crate::engine::StoreSession;

pub use normalize::{MAX_SAFE_INTEGER, NUMERIC_TYPE, Normalized, TEXT_TYPE, infer_columns, normalize};
pub use validate::prepare_statement;

/// Rows returned to the caller; one more is fetched to detect truncation.
pub const MAX_ROWS: usize = 1000;

/// Validates, runs and normalizes `sql` against the store at `store_path`.
pub async fn run_query(store_path: &Path, sql: &str) -> Result<QueryResult, SiftError> {
    let statement = prepare_statement(sql)?;

    let session = StoreSession::open(store_path)
        .await
        .map_err(|e| SiftError::QueryExecution(e.to_string()))?;

    let started = Instant::now();
    let df = session
        .read_only_sql(statement)
        .await
        .and_then(|df| df.limit(0, Some(MAX_ROWS + 1)))
        .map_err(|e| SiftError::QueryExecution(e.to_string()))?;
    let columns = ColumnMeta::from_schema(df.schema().as_arrow());
    let batches = df
        .collect()
        .await
        .map_err(|e| SiftError::QueryExecution(e.to_string()))?;
    let execution_time_ms = (started.elapsed().as_secs_f64() * 1000.0).round() as u64;

    let Normalized {
        columns,
        rows,
        truncated,
    } = normalize(columns, &batches, MAX_ROWS)?;

    info!(
        "Query returned {} rows (truncated: {}) in {} ms",
        rows.len(),
        truncated,
        execution_time_ms
    );

    Ok(QueryResult {
        columns,
        rows,
        truncated,
        execution_time_ms,
    })
}
