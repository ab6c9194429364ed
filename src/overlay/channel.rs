// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Channels from the UI to the relay.

use crate::error::{AppError, Result};
use crate::models::{RelayReply, RelayRequest};
use crate::routes::relay::dispatch;
use crate::AppState;
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// One request, one reply.
///
/// `ChannelInvalidated` means the relay side is gone and only a page reload
/// reconnects it.
#[async_trait]
pub trait RelayChannel: Send + Sync {
    async fn send(&self, request: RelayRequest) -> Result<RelayReply>;
}

/// Send `request` and wait at most `timeout` for the reply.
///
/// The send runs on its own task, so hitting the timeout only stops the
/// caller from waiting; the relay still finishes the request.
pub async fn send_with_timeout(
    channel: Arc<dyn RelayChannel>,
    request: RelayRequest,
    timeout: Duration,
) -> Result<RelayReply> {
    let action = request.action();
    let handle = tokio::spawn(async move { channel.send(request).await });

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => Err(AppError::Internal(anyhow!("relay task failed: {}", e))),
        Err(_) => {
            tracing::warn!(action, timeout_secs = timeout.as_secs(), "Relay reply timed out");
            Err(AppError::Timeout)
        }
    }
}

/// Relay reached over HTTP (`POST {base}/relay`).
#[derive(Clone)]
pub struct HttpRelayChannel {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpRelayChannel {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/relay", base_url.trim_end_matches('/')),
            token,
        }
    }
}

#[async_trait]
impl RelayChannel for HttpRelayChannel {
    async fn send(&self, request: RelayRequest) -> Result<RelayReply> {
        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                tracing::warn!(error = %e, "Relay unreachable");
                AppError::ChannelInvalidated
            } else {
                AppError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Relay refused our access token");
            return Err(AppError::RelayUnauthorized);
        }
        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: format!("Relay rejected the message ({})", status),
            });
        }

        response
            .json::<RelayReply>()
            .await
            .map_err(|e| AppError::Network(format!("Malformed relay reply: {}", e)))
    }
}

/// Relay running in the same process.
#[derive(Clone)]
pub struct LocalRelayChannel {
    state: Arc<AppState>,
}

impl LocalRelayChannel {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl RelayChannel for LocalRelayChannel {
    async fn send(&self, request: RelayRequest) -> Result<RelayReply> {
        Ok(dispatch(&self.state, request).await)
    }
}
