// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent relay and HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by the relay, the provider client and the
/// overlay.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("API key cannot be empty")]
    EmptyCredential,

    #[error("API key not found. Please set up your Gemini API key.")]
    NoCredential,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Rate limit exceeded after {attempts} attempts. Please wait a moment and try again.")]
    RateLimited { attempts: u32 },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("The model returned an empty response. Please try again.")]
    EmptyGeneration,

    #[error("Could not extract video information: {0}")]
    ExtractionFailure(String),

    #[error("Extension context invalidated")]
    ChannelInvalidated,

    #[error("Relay access token rejected")]
    RelayUnauthorized,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error only clears by reloading the page.
    pub fn requires_reload(&self) -> bool {
        matches!(self, AppError::ChannelInvalidated)
    }

    /// Whether the provider rejected the request for rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            AppError::RateLimited { .. } | AppError::Api { status: 429, .. }
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::EmptyCredential | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(self.to_string()))
            }
            AppError::NoCredential => (StatusCode::UNAUTHORIZED, "no_credential", None),
            AppError::RelayUnauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                Some(self.to_string()),
            ),
            AppError::Api { .. } | AppError::EmptyGeneration | AppError::Network(_) => {
                (StatusCode::BAD_GATEWAY, "provider_error", Some(self.to_string()))
            }
            AppError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout", None),
            AppError::StorageUnavailable(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::ExtractionFailure(_) | AppError::ChannelInvalidated => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                Some(self.to_string()),
            ),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AppError>;
