// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::RoleName;
use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown username or wrong password; the two are indistinguishable
    #[error("Bad credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Already taken. Select another username!")]
    DuplicateUsername,

    #[error("Email entered already exists, use another email")]
    DuplicateEmail,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Seed data is missing a role row
    #[error("Role does not exist: {0}")]
    RoleNotFound(RoleName),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::DuplicateUsername
            | AppError::DuplicateEmail
            | AppError::Validation(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "AUTH_001",
            AppError::InvalidToken(_) => "AUTH_002",
            AppError::DuplicateUsername => "REG_001",
            AppError::DuplicateEmail => "REG_002",
            AppError::Validation(_) => "VAL_001",
            AppError::InvalidInput(_) => "VAL_002",
            AppError::RoleNotFound(_) => "ROLE_001",
            AppError::Hashing(_) => "HASH_001",
            AppError::Token(_) => "TOKEN_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Whether the failure is the server's fault rather than the caller's
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidToken(_) => "Invalid or expired token".to_string(),
            AppError::InvalidInput(_) => "Invalid request format".to_string(),
            AppError::RoleNotFound(_) => "Server is missing role configuration".to_string(),
            AppError::Io(_) | AppError::Json(_) => "Internal server error".to_string(),
            AppError::Hashing(_) | AppError::Token(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
            // client-facing messages are already safe to show
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_server_error() {
            tracing::error!(code = error_code, error = %self, "request failed");
        } else {
            tracing::debug!(code = error_code, error = %self, "request rejected");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "message": message,
            "code": error_code,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
