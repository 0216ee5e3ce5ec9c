//! Error types and handling
//!
//! `AppError` is the HTTP-facing error. Store and service errors are
//! converted into it at the API boundary and rendered as a consistent JSON
//! body.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;
use crate::models::EventMode;
use crate::services::ServiceError;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input or business rule violation (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body failed field validation (400)
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    /// Conflict - uniqueness or referential constraint (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Image store failure (502)
    #[error("Upstream error: {0}")]
    BadGateway(String),

    /// Optional collaborator is not configured (503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error response
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, should_log) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", false),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", false),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error", false),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", false),
            AppError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "upstream_error", true),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", true)
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", true),
        };

        // Log server errors
        if should_log {
            error!(error = %self, error_type = error_type, "Request error");
        }

        let mut body = ErrorResponse::new(error_type, self.to_string());
        if let AppError::Validation(fields) = &self {
            body = body.with_details(serde_json::json!({ "errors": fields }));
        }

        (status, Json(body)).into_response()
    }
}

// Implement From for common error types

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(msg) => AppError::BadRequest(msg),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::ConstraintViolation(msg) => AppError::Conflict(msg),
            ServiceError::Store(store) => store.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(msg) => AppError::Conflict(msg),
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let fields = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let message = errors
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "Invalid value".to_string());
                (field.to_string(), message)
            })
            .collect();
        AppError::Validation(fields)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();

        let message = match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Request body must be JSON (Content-Type: application/json)".to_string()
            }
            JsonRejection::JsonSyntaxError(_) => {
                "Invalid JSON format. Please check your request body.".to_string()
            }
            JsonRejection::JsonDataError(_) if detail.contains("mode") => format!(
                "Invalid event mode. Valid values are: {}",
                EventMode::valid_values()
            ),
            JsonRejection::JsonDataError(_) if detail.contains("missing field") => detail,
            JsonRejection::JsonDataError(_) => {
                "Invalid value provided for one or more fields. Please check your request body format."
                    .to_string()
            }
            _ => "Invalid request body format".to_string(),
        };

        AppError::BadRequest(message)
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
