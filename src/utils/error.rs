use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bulk_send::BulkSendError;
use serde_json::json;
use std::fmt;

use crate::config::DirectoryError;

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    DirectoryError(String),
    ValidationError(String),
    NotFound(String),
    Conflict(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::DirectoryError(msg) => write!(f, "Directory error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError::DirectoryError(err.to_string())
    }
}

impl From<BulkSendError> for AppError {
    fn from(err: BulkSendError) -> Self {
        match err {
            BulkSendError::Validation(msg) => AppError::ValidationError(msg),
            BulkSendError::NotFound(msg) => AppError::NotFound(msg),
            err @ BulkSendError::TemplateNotSendable { .. } => AppError::Conflict(err.to_string()),
            BulkSendError::Store(msg) => AppError::InternalError(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::DirectoryError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
