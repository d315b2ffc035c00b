//! Error types for survey-rs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("無効なトークンです")]
    TokenNotFound,

    #[error("このURLは無効化されています")]
    TokenDisabled,

    #[error("このURLは有効期限が切れています")]
    TokenExpired,

    #[error("回答数上限に達しています")]
    TokenQuotaExhausted,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited")]
    RateLimited,

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) | Self::TokenNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_)
            | Self::TokenDisabled
            | Self::TokenExpired
            | Self::TokenQuotaExhausted => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::TokenDisabled => "TOKEN_DISABLED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenQuotaExhausted => "TOKEN_QUOTA_EXHAUSTED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Returns the message to expose to clients.
    ///
    /// Server-side detail is withheld for 5xx errors; clients get a generic
    /// message while the specifics go to the log.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.is_server_error() {
            "サーバーエラーが発生しました".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors with full detail
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.client_message(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_state_errors_are_forbidden() {
        assert_eq!(AppError::TokenDisabled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::TokenExpired.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::TokenQuotaExhausted.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_token_not_found_is_404() {
        assert_eq!(AppError::TokenNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::TokenNotFound.error_code(), "TOKEN_NOT_FOUND");
    }

    #[test]
    fn test_server_error_message_is_generic() {
        let err = AppError::Database("connection refused at 10.0.0.5".to_string());
        assert_eq!(err.client_message(), "サーバーエラーが発生しました");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_client_error_message_is_specific() {
        let err = AppError::TokenQuotaExhausted;
        assert_eq!(err.client_message(), "回答数上限に達しています");
    }
}
