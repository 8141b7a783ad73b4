use serde::{Deserialize, Serialize};

use crate::core::TableSummary;

/// Request body for the query endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub upload_id: Option<String>,
    #[serde(default)]
    pub sql: Option<String>,
}

/// Response of a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub upload_id: String,
    pub summary: TableSummary,
}

/// Error response format.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
