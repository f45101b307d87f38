//! Unified error handling for the backend API.
//!
//! Handlers use the `?` operator; `ApiError` implements `IntoResponse` and
//! maps each variant to an HTTP status with a JSON `{error, details?}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The document store was never configured; writes fail fast
    #[error("document store is not initialized")]
    StoreNotInitialized,

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Authentication required but not provided or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Generic internal error
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotInitialized => ApiError::StoreNotInitialized,
            StoreError::NotFound(resource) => ApiError::NotFound(resource.to_string()),
            StoreError::Backend(e) => ApiError::Internal(e),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            ApiError::StoreNotInitialized => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Document store is not configured".to_string(),
                None,
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                format!("{} not found", resource),
                None,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
