mod error;
mod handlers;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use log::info;
use tower_http::trace::TraceLayer;

use crate::core::SiftError;
use crate::service::SiftService;

pub use error::ApiError;
pub use types::{ErrorResponse, QueryRequest, UploadResponse};

pub struct SiftApi {
    service: Arc<SiftService>,
}

impl SiftApi {
    pub fn new(service: SiftService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn router(&self) -> Router {
        let body_limit = self.service.config().server.max_upload_bytes;
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/upload", post(handlers::upload))
            .route("/api/query", post(handlers::query))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(TraceLayer::new_for_http())
            .with_state(self.service.clone())
    }

    pub async fn serve(self, addr: &str) -> Result<(), SiftError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| SiftError::IoError(format!("binding to {addr}: {e}")))?;
        info!("Listening on {}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| SiftError::IoError(format!("serving: {e}")))?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
