use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::capture::CaptureError;
use crate::export::AssemblyError;
use crate::models::edit::EditError;
use crate::render::TemplateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    InvalidTemplate(#[from] TemplateError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::NotFound { .. } => AppError::NotFound(err.to_string()),
            EditError::BlankTag(_) => AppError::Validation(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidTemplate(e) => {
                (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE", e.to_string())
            }
            AppError::Capture(e) => {
                tracing::error!("Capture error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CAPTURE_FAILED",
                    "A page could not be captured".to_string(),
                )
            }
            AppError::Assembly(e) => {
                tracing::error!("Assembly error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ASSEMBLY_FAILED",
                    "The document could not be assembled".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
