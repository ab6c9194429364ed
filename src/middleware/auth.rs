// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Relay token middleware.
//!
//! When `RELAY_TOKEN` is configured, only callers presenting it as a bearer
//! token (the extension) may use the relay. Without it the relay relies on
//! being bound to loopback.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Require the configured relay token, if any.
pub async fn require_relay_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.config.relay_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match presented {
        Some(token) if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) => {
            Ok(next.run(request).await)
        }
        Some(_) => {
            tracing::warn!("Blocked relay request with wrong token");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Blocked relay request without token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
