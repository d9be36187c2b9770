//! Error types for the alert API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use broadcast::BroadcastError;
use storage::StorageError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Storage error from a read or admin route.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Engine error from a trigger route.
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Storage(err) => storage_status(err),
            ApiError::Broadcast(BroadcastError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Broadcast(BroadcastError::Persistence(err)) => storage_status(err),
            ApiError::Broadcast(BroadcastError::Dispatch(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Broadcast(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn storage_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
        StorageError::AlreadyExists { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        }

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
