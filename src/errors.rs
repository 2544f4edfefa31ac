//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::services::TokenError;

/// Field name to message mapping returned with validation failures
pub type FieldErrors = BTreeMap<String, String>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    #[error("invalid email or password")]
    InvalidEmailOrPassword,

    // Resource errors
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Conflict(&'static str),

    // Client input
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Request timed out")]
    Timeout,

    // Infrastructure
    #[error("Repository error while trying to {context}")]
    Repository {
        context: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    code: &'static str,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidEmailOrPassword => "INVALID_EMAIL_OR_PASSWORD",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Timeout => "TIMEOUT",
            AppError::Token(e) if e.is_client_error() => "AUTH_ERROR",
            AppError::Repository { .. } | AppError::Token(_) | AppError::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidEmailOrPassword => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Token(e) if e.is_client_error() => StatusCode::UNAUTHORIZED,
            AppError::Repository { .. } | AppError::Token(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal/security errors
            AppError::Repository { context, source } => {
                tracing::error!(error = %source, "Repository error while trying to {}", context);
                "An internal error occurred".to_string()
            }
            AppError::Token(e) if e.is_client_error() => "Invalid or expired token".to_string(),
            AppError::Token(e) => {
                tracing::error!(error = %e, "Token error");
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            status: "error",
            code: self.code(),
            error: self.user_message(),
            errors: match self {
                AppError::Validation(fields) => Some(fields),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T> {
        self.ok_or(AppError::NotFound(entity))
    }
}

/// Convenience constructors
impl AppError {
    /// Single-field validation failure.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(name.into(), message.into());
        AppError::Validation(fields)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Wrap a store error with the operation that produced it.
    ///
    /// Pool acquisition timeouts surface as [`AppError::Timeout`].
    pub fn repository(context: &'static str, source: DbErr) -> Self {
        match source {
            DbErr::ConnectionAcquire(_) => {
                tracing::warn!(error = %source, "Connection acquire failed while trying to {}", context);
                AppError::Timeout
            }
            source => AppError::Repository { context, source },
        }
    }

    /// Like [`AppError::repository`], but a unique-constraint violation becomes a conflict on `field`.
    pub fn repository_unique(context: &'static str, field: &'static str, source: DbErr) -> Self {
        let classified = source.sql_err();
        Self::classified_repository(context, field, classified, source)
    }

    fn classified_repository(
        context: &'static str,
        field: &'static str,
        classified: Option<SqlErr>,
        source: DbErr,
    ) -> Self {
        match classified {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(field),
            _ => AppError::repository(context, source),
        }
    }
}
