// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential tier classification.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Access level of the stored credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Tier {
    Paid,
    #[default]
    Free,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Paid => "paid",
            Tier::Free => "free",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(Tier::Paid),
            "free" => Some(Tier::Free),
            _ => None,
        }
    }
}

/// Validity of the stored credential as of the last probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum KeyStatus {
    Active,
    Expired,
    Invalid,
    #[default]
    Unknown,
}

impl KeyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Expired => "expired",
            KeyStatus::Invalid => "invalid",
            KeyStatus::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(KeyStatus::Active),
            "expired" => Some(KeyStatus::Expired),
            "invalid" => Some(KeyStatus::Invalid),
            "unknown" => Some(KeyStatus::Unknown),
            _ => None,
        }
    }
}

/// Result of the last successful probe. Consistent, not guaranteed fresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TierStatus {
    pub tier: Tier,
    pub status: KeyStatus,
    /// When the probe ran (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<String>,
}

impl TierStatus {
    pub fn new(tier: Tier, status: KeyStatus) -> Self {
        Self {
            tier,
            status,
            checked_at: None,
        }
    }

    /// Conservative classification used when nothing is known.
    pub fn unknown() -> Self {
        Self::new(Tier::Free, KeyStatus::Unknown)
    }
}
