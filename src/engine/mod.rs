//! Embedded analytical engine access.
//!
//! A [`StoreSession`] is a short-lived DataFusion context with a workspace's
//! store registered as [`TABLE_NAME`]. Sessions are opened per call and never
//! shared; dropping one releases every handle on the store file.

use std::path::Path;

use datafusion::error::{DataFusionError, Result};
use datafusion::execution::context::SQLOptions;
use datafusion::prelude::{DataFrame, ParquetReadOptions, SessionConfig, SessionContext};
use log::debug;

/// The single table every store exposes.
pub const TABLE_NAME: &str = "tablename";

pub struct StoreSession {
    ctx: SessionContext,
}

impl StoreSession {
    /// Opens a session over `store_path`. A missing store yields a session
    /// without the table, so queries fail with the engine's own message.
    pub async fn open(store_path: &Path) -> Result<Self> {
        // Unquoted identifiers keep their case so headers like `Name` can be
        // selected as written.
        let config = SessionConfig::new()
            .set_bool("datafusion.execution.parquet.schema_force_view_types", false)
            .set_bool("datafusion.sql_parser.enable_ident_normalization", false);
        let ctx = SessionContext::new_with_config(config);

        if store_path.is_file() {
            let path = store_path.to_str().ok_or_else(|| {
                DataFusionError::Execution(format!(
                    "store path is not valid UTF-8: {}",
                    store_path.display()
                ))
            })?;
            ctx.register_parquet(TABLE_NAME, path, ParquetReadOptions::default())
                .await?;
            debug!("Registered store {} as {}", store_path.display(), TABLE_NAME);
        }

        Ok(Self { ctx })
    }

    pub async fn table(&self) -> Result<DataFrame> {
        self.ctx.table(TABLE_NAME).await
    }

    /// Plans a statement that may only read: DDL, DML and session
    /// statements are refused by the planner.
    pub async fn read_only_sql(&self, sql: &str) -> Result<DataFrame> {
        let options = SQLOptions::new()
            .with_allow_ddl(false)
            .with_allow_dml(false)
            .with_allow_statements(false);
        self.ctx.sql_with_options(sql, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    fn write_store(path: &Path) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, true),
            Field::new("name", DataType::Utf8, true),
        ]));
        let ids = Int64Array::from(vec![1, 2, 3]);
        let names = StringArray::from(vec!["a", "b", "c"]);
        let batch =
            RecordBatch::try_new(schema.clone(), vec![Arc::new(ids), Arc::new(names)]).unwrap();
        let mut writer = ArrowWriter::try_new(File::create(path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[tokio::test]
    async fn test_registered_store_is_queryable() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("data.parquet");
        write_store(&store);

        let session = StoreSession::open(&store).await.unwrap();
        let table = session.table().await.unwrap();
        let fields = table.schema().fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].data_type(), &DataType::Utf8);
        assert_eq!(table.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_store_has_no_table() {
        let dir = TempDir::new().unwrap();
        let session = StoreSession::open(&dir.path().join("data.parquet"))
            .await
            .unwrap();
        assert!(session.table().await.is_err());
    }

    #[tokio::test]
    async fn test_read_only_sql_refuses_ddl() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("data.parquet");
        write_store(&store);

        let session = StoreSession::open(&store).await.unwrap();
        assert!(session.read_only_sql("DROP TABLE tablename").await.is_err());
        assert!(
            session
                .read_only_sql("CREATE TABLE other AS SELECT 1")
                .await
                .is_err()
        );
        assert!(session.table().await.is_ok());
    }
}
