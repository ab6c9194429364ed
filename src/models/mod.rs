// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the relay and the UI layer.

pub mod identification;
pub mod metadata;
pub mod relay;
pub mod tier;

pub use identification::IdentificationResult;
pub use metadata::VideoMetadata;
pub use relay::{RelayReply, RelayRequest};
pub use tier::{KeyStatus, Tier, TierStatus};
