use arrow::datatypes::Schema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row keyed by column name, in result column order.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub dtype: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, dtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
        }
    }

    /// Columns in schema order, typed with the engine's own type names.
    pub fn from_schema(schema: &Schema) -> Vec<ColumnMeta> {
        schema
            .fields()
            .iter()
            .map(|field| ColumnMeta::new(field.name(), field.data_type().to_string()))
            .collect()
    }
}

/// Shape of a freshly ingested table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub columns: Vec<ColumnMeta>,
    pub row_count: u64,
}

/// Normalized, capped result of one read query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Row>,
    pub truncated: bool,
    pub execution_time_ms: u64,
}
