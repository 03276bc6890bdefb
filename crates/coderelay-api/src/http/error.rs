//! Application error type mapping to HTTP status codes and the error body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use coderelay_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat service errors.
    Chat(ChatError),
    /// Malformed request body or parameters.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(e @ ChatError::MissingFields(_)) => {
                (StatusCode::BAD_REQUEST, "MISSING_FIELDS", e.to_string())
            }
            AppError::Chat(e @ ChatError::ChatNotFound(_)) => {
                (StatusCode::NOT_FOUND, "CHAT_NOT_FOUND", e.to_string())
            }
            AppError::Chat(e @ ChatError::BotMismatch { .. }) => {
                (StatusCode::BAD_REQUEST, "BOT_MISMATCH", e.to_string())
            }
            AppError::Chat(e @ ChatError::InvalidBotConfig(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_BOT_CONFIG", e.to_string())
            }
            // Storage details stay in the log.
            AppError::Chat(ChatError::StorageFault(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_FAULT",
                "storage unavailable".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, error = ?self, "Request failed");
        } else {
            tracing::debug!(code, %message, "Request rejected");
        }

        let body = json!({
            "success": false,
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
