//! Domain error types for the Kraken proxy.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! Every variant maps to an HTTP status and a client-safe message; internal detail
//! is logged server-side only.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::auth::AuthRejection;
use crate::services::kraken::UpstreamError;
use crate::services::token::TokenError;

/// Message returned for every non-operational failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went very wrong!";

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or malformed credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(AuthRejection),

    /// A well-formed token that could not be redeemed
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    /// The trading API rejected or failed the call
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Unexpected defect
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error (always >= 400).
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(err) => err
                .status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is an anticipated failure rather than a programming defect.
    pub fn is_operational(&self) -> bool {
        !matches!(self, AppError::Internal(_))
    }

    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Unauthorized(_) | AppError::InvalidToken(_) => "UNAUTHORIZED",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to send to the client.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Unauthorized(rejection) => rejection.message().to_string(),
            AppError::InvalidToken(_) => AuthRejection::InvalidToken.message().to_string(),
            AppError::Upstream(err) => err.message.clone(),
            AppError::NotFound(_) => self.to_string(),
            AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Internal(detail) => {
                tracing::error!("Unexpected error: {}", detail);
            }
            AppError::InvalidToken(err) => {
                tracing::warn!("Rejected credential token: {}", err);
            }
            AppError::Upstream(err) => {
                tracing::warn!("Trading API call failed: {}", err);
            }
            _ => {}
        }

        HttpResponse::build(AppError::status_code(self)).json(ErrorResponse::new(
            self.error_code(),
            self.client_message(),
        ))
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always `"error"`
    pub status: String,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: error.to_string(),
            message: message.into(),
        }
    }

    /// Generic 500 body.
    pub fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_ERROR_MESSAGE)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        AppError::Unauthorized(rejection)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}
