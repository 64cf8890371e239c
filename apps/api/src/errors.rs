use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::advisor_client::AdvisorError;
use crate::statement::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::Upload(e) => (e.status(), "UPLOAD_ERROR", e.body_text()),
            AppError::Extract(ExtractError::MalformedDocument(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MALFORMED_DOCUMENT",
                msg.clone(),
            ),
            AppError::Extract(ExtractError::MissingColumn(column)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MISSING_COLUMN",
                format!("Statement has no '{column}' column"),
            ),
            AppError::Advisor(e) => {
                tracing::error!("Advisor error: {e}");
                let code = match e {
                    AdvisorError::Authentication(_) => "ADVISOR_AUTH_ERROR",
                    AdvisorError::ServiceUnavailable(_) => "ADVISOR_UNAVAILABLE",
                    AdvisorError::EmptyContent => "ADVISOR_EMPTY_RESPONSE",
                };
                (
                    StatusCode::BAD_GATEWAY,
                    code,
                    "The advice service could not produce a response".to_string(),
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
