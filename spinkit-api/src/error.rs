//! Error types for spinkit-api
//!
//! Every handler error renders as `(status, {"error": message})`.
//! Notion failures keep Notion's own error code alongside the message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::notion::NotionError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Notion API failure, status mapped from Notion's response
    #[error(transparent)]
    Notion(#[from] NotionError),

    /// spinkit-common error
    #[error(transparent)]
    Common(#[from] spinkit_common::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Common(spinkit_common::Error::Database(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Notion(err) => {
                let status = StatusCode::from_u16(err.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (
                    status,
                    json!({ "error": err.to_string(), "code": err.code() }),
                )
            }
            ApiError::Common(spinkit_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, json!({ "error": msg }))
            }
            ApiError::Common(spinkit_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            ApiError::Common(err) => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": err.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
