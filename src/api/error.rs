use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::warn;

use crate::core::SiftError;

use super::types::ErrorResponse;

/// API-specific errors with HTTP status code mapping.
#[derive(Debug)]
pub enum ApiError {
    Sift(SiftError),
    InvalidRequest(String),
    Rejected(StatusCode, String),
}

impl From<SiftError> for ApiError {
    fn from(err: SiftError) -> Self {
        ApiError::Sift(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Sift(err.into())
    }
}

fn classify(err: &SiftError) -> (StatusCode, &'static str) {
    match err {
        SiftError::InvalidIdentifier(_) => (StatusCode::NOT_FOUND, "INVALID_UPLOAD_ID"),
        SiftError::WorkspaceNotFound(_) => (StatusCode::NOT_FOUND, "UPLOAD_NOT_FOUND"),
        SiftError::EmptyQuery => (StatusCode::BAD_REQUEST, "EMPTY_QUERY"),
        SiftError::NotAReadQuery => (StatusCode::BAD_REQUEST, "NOT_A_READ_QUERY"),
        SiftError::QueryExecution(_) => (StatusCode::BAD_REQUEST, "QUERY_FAILED"),
        SiftError::EmptyResultSchema => (StatusCode::BAD_REQUEST, "EMPTY_RESULT_SCHEMA"),
        SiftError::Ingestion(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INGESTION_FAILED"),
        SiftError::IoError(_) | SiftError::ConfigParsingError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

fn rejection_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        s if s.is_server_error() => "INTERNAL_ERROR",
        _ => "INVALID_REQUEST",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Sift(err) => {
                let (status, code) = classify(&err);
                (status, code, err.to_string())
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Rejected(status, msg) => (status, rejection_code(status), msg),
        };

        warn!("Request failed with {}: {}", status, message);

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
