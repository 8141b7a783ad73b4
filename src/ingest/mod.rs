//! Turns an uploaded delimited file into the workspace's single table.

mod sniff;
mod writer;

use std::path::Path;

use log::info;

use crate::core::{ColumnMeta, SiftError, TableSummary};
use crate::engine::StoreSession;

pub use sniff::{Layout, detect_layout};

/// Replaces the store's table with the contents of `raw_path` and reports
/// the resulting schema and row count as seen by the engine.
///
/// Re-ingesting the same file yields the same summary. On failure the
/// store is left without a table.
pub async fn ingest(raw_path: &Path, store_path: &Path) -> Result<TableSummary, SiftError> {
    writer::drop_store(store_path)?;

    let raw = raw_path.to_path_buf();
    let store = store_path.to_path_buf();
    let (layout, written) = tokio::task::spawn_blocking(move || {
        let layout = detect_layout(&raw)?;
        let written = writer::write_store(&raw, &store, &layout)?;
        Ok::<_, SiftError>((layout, written))
    })
    .await
    .map_err(|e| SiftError::Ingestion(format!("ingestion worker failed: {}", e)))??;

    let summary = describe(store_path).await?;
    info!(
        "Ingested {} into {}: {} columns, {} rows (delimiter {:?}, {} written)",
        raw_path.display(),
        store_path.display(),
        summary.columns.len(),
        summary.row_count,
        layout.delimiter as char,
        written
    );
    Ok(summary)
}

/// Reads the table's shape back through the engine.
pub async fn describe(store_path: &Path) -> Result<TableSummary, SiftError> {
    let session = StoreSession::open(store_path).await.map_err(ingestion_error)?;
    let table = session.table().await.map_err(ingestion_error)?;
    let columns = ColumnMeta::from_schema(table.schema().as_arrow());
    let row_count = table.count().await.map_err(ingestion_error)? as u64;
    Ok(TableSummary { columns, row_count })
}

fn ingestion_error(err: impl std::fmt::Display) -> SiftError {
    SiftError::Ingestion(err.to_string())
}
