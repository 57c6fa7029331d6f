//! Error handling for YogaStudio
//!
//! This module defines the main error type used throughout the application
//! and the single place where domain outcomes become HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Main error type for YogaStudio application
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for YogaStudio operations
pub type Result<T> = std::result::Result<T, StudioError>;

/// Body sent with every error and every plain acknowledgement
#[derive(Debug, Clone, Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl StudioError {
    pub fn validation(message: impl Into<String>) -> Self {
        StudioError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        StudioError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        StudioError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StudioError::Conflict(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        StudioError::Unauthenticated(message.into())
    }

    /// HTTP status for this outcome
    pub fn status_code(&self) -> StatusCode {
        match self {
            StudioError::Validation(_) | StudioError::Conflict(_) => StatusCode::BAD_REQUEST,
            StudioError::InvalidCredentials | StudioError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            StudioError::Forbidden(_) => StatusCode::FORBIDDEN,
            StudioError::NotFound(_) => StatusCode::NOT_FOUND,
            StudioError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is an expected domain outcome rather than a failure
    pub fn is_expected(&self) -> bool {
        !self.status_code().is_server_error()
    }

    /// Message safe to show to API clients
    pub fn client_message(&self) -> String {
        if self.is_expected() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StudioError::Database(_) => ErrorSeverity::Critical,
            StudioError::Migration(_) => ErrorSeverity::Critical,
            StudioError::Config(_) => ErrorSeverity::Critical,
            StudioError::Forbidden(_) => ErrorSeverity::Warning,
            StudioError::InvalidCredentials => ErrorSeverity::Warning,
            StudioError::Unauthenticated(_) => ErrorSeverity::Warning,
            StudioError::RateLimited => ErrorSeverity::Warning,
            StudioError::Validation(_) => ErrorSeverity::Info,
            StudioError::NotFound(_) => ErrorSeverity::Info,
            StudioError::Conflict(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(error = %self, severity = %self.severity(), "Request failed");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(error = %self, "Request rejected");
            }
            ErrorSeverity::Info => {
                tracing::debug!(error = %self, "Request rejected");
            }
        }

        (self.status_code(), Json(MessageBody::new(self.client_message()))).into_response()
    }
}

impl From<JsonRejection> for StudioError {
    fn from(rejection: JsonRejection) -> Self {
        StudioError::Validation(rejection.body_text())
    }
}

impl From<config::ConfigError> for StudioError {
    fn from(err: config::ConfigError) -> Self {
        StudioError::Config(err.to_string())
    }
}

/// SQLSTATE codes the repositories translate into domain outcomes
pub mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
}

/// Returns the SQLSTATE of a database error, if any
pub fn sqlstate_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Returns the violated constraint's name, if any
pub fn constraint_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
