//! Error handling module
//!
//! Defines error types and handling logic used in the project

use crate::models::api::ErrorBody;
use crate::services::router::RouterError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Message returned when no completion provider has a credential
pub const NOT_CONFIGURED_MESSAGE: &str = "AI API key not configured";

/// Message returned when every completion provider failed
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate content";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Completion router failure
    #[error("{0}")]
    Completion(#[from] RouterError),

    /// Coin store failure; `context` is what the caller sees
    #[error("Storage error: {context}: {detail}")]
    Storage { context: String, detail: String },

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Completion(_)
            | AppError::Storage { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller
    ///
    /// Internal details stay in the logs; callers get a stable message per failure kind.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Completion(RouterError::NoProvidersConfigured) => NOT_CONFIGURED_MESSAGE.to_string(),
            AppError::Completion(RouterError::AllProvidersFailed { .. }) => GENERATION_FAILED_MESSAGE.to_string(),
            AppError::Storage { context, .. } => context.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Convert to the `{ "error": ... }` body
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else {
            tracing::warn!("Client error: {} - Status code: {}", self, status);
        }

        (status, Json(self.to_error_body())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add storage error context
    fn storage_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn storage_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Storage {
            context: message.to_string(),
            detail: e.to_string(),
        })
    }
}
