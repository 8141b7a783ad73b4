use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header;
use tokio::io::AsyncWriteExt;

use crate::core::QueryResult;
use crate::service::SiftService;
use crate::workspace::Workspace;

use super::error::ApiError;
use super::types::{QueryRequest, UploadResponse};

const MULTIPART_MIME: &str = "multipart/form-data";

pub async fn health() -> &'static str {
    "OK"
}

pub async fn upload(
    State(service): State<Arc<SiftService>>,
    request: Request,
) -> Result<Json<UploadResponse>, ApiError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(MULTIPART_MIME));
    if !is_multipart {
        return Err(ApiError::InvalidRequest(
            "Request must be multipart/form-data".to_string(),
        ));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;

    let workspace = service.create_workspace()?;
    if !save_first_file(&mut multipart, &workspace).await? {
        return Err(ApiError::InvalidRequest("No file provided".to_string()));
    }

    let summary = service.ingest(&workspace).await?;
    Ok(Json(UploadResponse {
        upload_id: workspace.id,
        summary,
    }))
}

/// Streams the first file part to the workspace's raw path. Later file
/// parts are skipped. Returns whether a file was written.
async fn save_first_file(
    multipart: &mut Multipart,
    workspace: &Workspace,
) -> Result<bool, ApiError> {
    let mut saved = false;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?
    {
        if saved || field.file_name().is_none() {
            continue;
        }

        let mut file = tokio::fs::File::create(&workspace.raw_path).await?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        file.sync_all().await?;
        saved = true;
    }
    Ok(saved)
}

pub async fn query(
    State(service): State<Arc<SiftService>>,
    body: Bytes,
) -> Result<Json<QueryResult>, ApiError> {
    let request: QueryRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::InvalidRequest("Invalid JSON body".to_string()))?;

    let upload_id = request
        .upload_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("uploadId is required".to_string()))?;
    let sql = request.sql.unwrap_or_default();

    let result = service.query(upload_id, &sql).await?;
    Ok(Json(result))
}
