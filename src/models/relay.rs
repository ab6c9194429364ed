// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Relay message schema shared with the extension.

use super::{IdentificationResult, KeyStatus, Tier, TierStatus, VideoMetadata};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A message sent to the relay, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RelayRequest {
    IdentifyEpisode {
        data: VideoMetadata,
    },
    SaveApiKey {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    CheckApiKey,
    GetApiKey,
    GetKeyStatus,
    ValidateKey,
}

impl RelayRequest {
    /// Action name, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            RelayRequest::IdentifyEpisode { .. } => "identifyEpisode",
            RelayRequest::SaveApiKey { .. } => "saveApiKey",
            RelayRequest::CheckApiKey => "checkApiKey",
            RelayRequest::GetApiKey => "getApiKey",
            RelayRequest::GetKeyStatus => "getKeyStatus",
            RelayRequest::ValidateKey => "validateKey",
        }
    }
}

/// The single reply to a relay message.
///
/// Untagged on the wire; variants are distinguished by their required
/// fields, so `Error` must stay first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RelayReply {
    Error {
        error: String,
    },
    Identified(IdentificationResult),
    Saved {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tier: Option<Tier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<KeyStatus>,
    },
    HasKey {
        #[serde(rename = "hasKey")]
        has_key: bool,
    },
    ApiKey {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    KeyStatus(TierStatus),
}

impl From<&AppError> for RelayReply {
    fn from(err: &AppError) -> Self {
        RelayReply::Error {
            error: err.to_string(),
        }
    }
}
