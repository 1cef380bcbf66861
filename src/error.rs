// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::token_verifier::AuthError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Also returned when the resource exists but belongs to someone else.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Storage error during {operation}: {cause}")]
    Storage {
        operation: &'static str,
        cause: String,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Build a mapper from a storage driver error, for use with `map_err`.
    pub fn storage<E: std::fmt::Display>(operation: &'static str) -> impl FnOnce(E) -> Self {
        move |e| AppError::Storage {
            operation,
            cause: e.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first field alphabetically so responses are deterministic.
        let first = errors
            .field_errors()
            .into_iter()
            .min_by(|a, b| a.0.cmp(&b.0))
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), reason)
            });

        match first {
            Some((field, reason)) => AppError::Validation { field, reason },
            None => AppError::BadRequest(errors.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized(err) => {
                tracing::debug!(kind = err.kind(), "Rejected credential");
                (StatusCode::UNAUTHORIZED, "unauthorized", Some(err.to_string()))
            }
            AppError::Validation { .. } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(self.to_string()),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found", Some(self.to_string()))
            }
            AppError::Storage { operation, cause } => {
                tracing::error!(operation = %operation, error = %cause, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Patch {
        #[validate(range(min = 0, max = 3, message = "must be between 0 and 3"))]
        mood: Option<i32>,
    }

    #[test]
    fn test_validation_errors_keep_field_and_message() {
        let err: AppError = Patch { mood: Some(7) }.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "mood");
                assert_eq!(reason, "must be between 0 and 3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_storage_errors_are_opaque() {
        let err = AppError::storage("insert workout")("connection reset by peer");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("weight", "must be greater than 0")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("workout", 7).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized(AuthError::Expired)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
