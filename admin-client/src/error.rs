//! Client error types

use http::StatusCode;
use shared::ApiErrorBody;
use thiserror::Error;

use crate::session::SessionStorageError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// In-process transport failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required; the session has already been cleared
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (client-side precondition or HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Structured error reported by the backend
    #[error("API error {code}: {message}")]
    Api {
        code: i32,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Any other non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session persistence failed
    #[error("Session storage error: {0}")]
    Storage(#[from] SessionStorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Maps a non-success, non-401 response to an error
    ///
    /// 404/403/400 keep their dedicated variants so callers can match on
    /// them; the backend's `{code, message}` body only supplies the text.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body).to_string();
        let api_err = serde_json::from_slice::<ApiErrorBody>(body).ok();
        let message = api_err
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| text.clone());

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            _ => match api_err {
                Some(e) => ClientError::Api {
                    code: e.code,
                    message: e.message,
                    details: e.details,
                },
                None => ClientError::Status {
                    status: status.as_u16(),
                    body: text,
                },
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
