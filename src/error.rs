use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// FailureKind
///
/// The two ways a remote call can fail from the screen's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The call was rejected, timed out, or answered with a non-success status.
    NetworkFailure,
    /// The server answered but the payload was absent or malformed.
    EmptyResult,
}

/// ClientError
///
/// Failure of a single call to the storefront backend.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend answered {status}")]
    Status { status: u16, message: Option<String> },

    #[error("empty or malformed response: {0}")]
    EmptyResult(String),
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Transport(e) if e.is_decode() => FailureKind::EmptyResult,
            ClientError::Transport(_) | ClientError::Status { .. } => FailureKind::NetworkFailure,
            ClientError::EmptyResult(_) => FailureKind::EmptyResult,
        }
    }

    /// Message to show inline: the backend's own `message` when it sent one,
    /// otherwise the screen's fallback text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Status { status: 401, .. })
    }
}

/// AppError
///
/// Failures of the shell's own form endpoints, rendered as JSON `{ "message": ... }`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    SignInFailed(String),

    #[error("{0}")]
    Rejected(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::SignInFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
