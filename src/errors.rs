//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::PasswordError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authorization token required")]
    Unauthorized,

    #[error("Insufficient permissions to access this resource")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Incorrect password")]
    PasswordIncorrect,

    #[error("Email address has not been validated")]
    EmailNotValidated,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found for the provided token")]
    UserNotFoundForToken,

    // Resource errors
    #[error("User not found")]
    NotFound,

    /// Repository lookup matched nothing. Services translate this into a
    /// call-site specific outcome.
    #[error("No rows in result set")]
    NoRows,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // Unit of Work misuse
    #[error("Transaction has already been committed")]
    AlreadyCommitted,

    #[error("Transaction has already been rolled back")]
    AlreadyRolledBack,

    #[error("Transaction is no longer open")]
    TransactionClosed,

    // External service errors
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Configuration error: {0}")]
    Config(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: u16,
    status: &'static str,
    message: String,
    data: Option<()>,
}

impl AppError {
    /// Get HTTP status code
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::PasswordIncorrect
            | AppError::EmailNotValidated
            | AppError::AccountDisabled
            | AppError::UserNotFoundForToken
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Password(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound | AppError::NoRows => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Password(_)
            | AppError::AlreadyCommitted
            | AppError::AlreadyRolledBack
            | AppError::TransactionClosed
            | AppError::Database(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::NoRows => AppError::NotFound.to_string(),

            AppError::Password(e) if e.is_input_error() => e.to_string(),

            // Hide details for internal errors
            AppError::Password(e) => {
                tracing::error!("Password hashing error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::AlreadyCommitted
            | AppError::AlreadyRolledBack
            | AppError::TransactionClosed => {
                tracing::error!("Unit of work misuse: {}", self);
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) | AppError::Config(msg) => {
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
            code: status.as_u16(),
            status: status.canonical_reason().unwrap_or_default(),
            message: self.user_message(),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_no_rows(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_no_rows(self) -> AppResult<T> {
        self.ok_or(AppError::NoRows)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}
