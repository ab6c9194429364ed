// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Relay endpoint: named actions for the extension UI.
//!
//! Every message gets exactly one reply. Component errors are turned into
//! `{error: message}` replies here and never surface as transport faults.

use crate::error::{AppError, Result};
use crate::models::{RelayReply, RelayRequest, TierStatus, VideoMetadata};
use crate::AppState;
use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use std::sync::Arc;
use validator::Validate;

/// Relay routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/relay", post(handle_message))
}

/// Decode one message and dispatch it.
async fn handle_message(State(state): State<Arc<AppState>>, body: Bytes) -> Json<RelayReply> {
    let request = match serde_json::from_slice::<RelayRequest>(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed relay message");
            return Json(RelayReply::Error {
                error: format!("Unknown or malformed message: {}", e),
            });
        }
    };

    Json(dispatch(&state, request).await)
}

/// Run one relay action and produce its reply.
pub async fn dispatch(state: &AppState, request: RelayRequest) -> RelayReply {
    let action = request.action();
    tracing::debug!(action, "Relay message received");

    let outcome = match request {
        RelayRequest::IdentifyEpisode { data } => identify_episode(state, data).await,
        RelayRequest::SaveApiKey { api_key } => save_api_key(state, &api_key).await,
        RelayRequest::CheckApiKey => state
            .store
            .get()
            .await
            .map(|key| RelayReply::HasKey {
                has_key: key.is_some(),
            }),
        RelayRequest::GetApiKey => state
            .store
            .get()
            .await
            .and_then(|key| key.ok_or(AppError::NoCredential))
            .map(|api_key| RelayReply::ApiKey { api_key }),
        RelayRequest::GetKeyStatus => state.store.tier_status().await.map(RelayReply::KeyStatus),
        RelayRequest::ValidateKey => validate_key(state).await.map(RelayReply::KeyStatus),
    };

    match outcome {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(action, error = %e, "Relay action failed");
            RelayReply::from(&e)
        }
    }
}

async fn identify_episode(state: &AppState, data: VideoMetadata) -> Result<RelayReply> {
    data.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let credential = state.store.get().await?.ok_or(AppError::NoCredential)?;
    let result = state.identifier.identify(&data, &credential).await?;
    Ok(RelayReply::Identified(result))
}

/// Save the key, then re-probe so the reply carries the new tier.
async fn save_api_key(state: &AppState, api_key: &str) -> Result<RelayReply> {
    state.store.save(api_key).await?;
    let status = state.prober.probe(api_key.trim()).await?;
    Ok(RelayReply::Saved {
        success: true,
        tier: Some(status.tier),
        status: Some(status.status),
    })
}

async fn validate_key(state: &AppState) -> Result<TierStatus> {
    let credential = state.store.get().await?.ok_or(AppError::NoCredential)?;
    state.prober.probe(&credential).await
}

/// Re-probe the stored credential, if any. Used at install and start.
pub async fn refresh_tier(state: &AppState) -> Result<Option<TierStatus>> {
    match state.store.get().await? {
        Some(credential) => state.prober.probe(&credential).await.map(Some),
        None => {
            tracing::info!("No API key stored, skipping tier probe");
            Ok(None)
        }
    }
}
