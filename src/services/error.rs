//! Service and HTTP error types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors raised by external-service adapters, media processing, and the
/// pipeline. Vendor failures are normalized into `Api` with a readable
/// message; nothing here is retried.
#[derive(Debug)]
pub enum ServiceError {
    Http(reqwest::Error),
    Api(String),
    Io(std::io::Error),
    Processing(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Http(e) => write!(f, "HTTP error: {}", e),
            ServiceError::Api(s) => write!(f, "{}", s),
            ServiceError::Io(e) => write!(f, "I/O error: {}", e),
            ServiceError::Processing(s) => write!(f, "Processing error: {}", s),
            ServiceError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::Http(e)
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Io(e)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Database(e)
    }
}

/// Error response for route handlers: a status code plus an
/// `{ "error": message }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Extension trait for logging internal errors and degrading them to a
/// generic 500 with a stable client-facing message.
pub trait LogErr<T> {
    fn log_500(self, context: &str) -> Result<T, ApiError>;
}

impl<T, E: std::fmt::Display> LogErr<T> for Result<T, E> {
    fn log_500(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!("{}: {}", context, e);
            ApiError::internal(context)
        })
    }
}
