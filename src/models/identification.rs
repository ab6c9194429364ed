// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identification result returned to the UI.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Provider answer normalised across response shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IdentificationResult {
    /// Free-form answer text
    pub result: String,
    /// Full provider response, kept for diagnostics
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub raw: serde_json::Value,
    /// Model that produced the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
