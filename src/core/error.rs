//! Error types and handling for the relay server.
//!
//! [`AppError`] is the failure half of every relay outcome. All variants are
//! reported to the caller the same way: HTTP 500 with `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use thiserror::Error;

use crate::api::models::ErrorResponse;

/// Message returned when no upstream credential is configured.
pub const MISSING_API_KEY_MESSAGE: &str =
    "Server missing API Key. Set ANTHROPIC_API_KEY in .env file.";

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// No upstream credential configured; the upstream is never contacted.
    #[error("Server missing API Key. Set ANTHROPIC_API_KEY in .env file.")]
    MissingApiKey,

    /// The upstream answered with a structured error; its message is passed through.
    #[error("{0}")]
    Upstream(String),

    /// The upstream answered without an error but also without any text.
    #[error("Upstream response contained no text content")]
    EmptyContent,

    /// Network failure, timeout, or an unreadable reply body
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Generic internal server errors with custom message
    #[error("{0}")]
    Internal(String),
}

/// Coarse classification of a failure, used for logs and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigurationMissing,
    UpstreamError,
    TransportFailure,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "configuration_missing",
            Self::UpstreamError => "upstream_error",
            Self::TransportFailure => "transport_failure",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingApiKey => ErrorKind::ConfigurationMissing,
            AppError::Upstream(_) | AppError::EmptyContent => ErrorKind::UpstreamError,
            AppError::Transport(_) => ErrorKind::TransportFailure,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
