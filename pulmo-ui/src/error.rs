//! Error types for pulmo-ui

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::vitals_model::VitalsModelError;
use crate::services::xray_model::XrayModelError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Engine rejected the inputs (400)
    #[error("Engine error: {0}")]
    Engine(#[from] pulmo_engine::EngineError),

    /// External vitals model failed (502)
    #[error("Vitals model error: {0}")]
    VitalsModel(#[from] VitalsModelError),

    /// External imaging model failed (502)
    #[error("Imaging model error: {0}")]
    XrayModel(#[from] XrayModelError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Engine(ref err) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", err.to_string())
            }
            // Model failures must stay distinguishable from a genuine
            // low-risk result: a gateway error, never a default score.
            ApiError::VitalsModel(ref err) => {
                (StatusCode::BAD_GATEWAY, "MODEL_ERROR", err.to_string())
            }
            ApiError::XrayModel(ref err) => {
                (StatusCode::BAD_GATEWAY, "MODEL_ERROR", err.to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
