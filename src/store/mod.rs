// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent key-value storage for the credential and its tier metadata.

pub mod credential;
pub mod kv;

pub use credential::CredentialStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore};

/// Storage keys as constants.
pub mod keys {
    /// The user's provider credential
    pub const API_KEY: &str = "gemini_api_key";
    pub const TIER: &str = "api_tier";
    pub const STATUS: &str = "api_key_status";
    pub const CHECKED_AT: &str = "api_key_checked_at";
    /// Successful results shown, drives the review prompt
    pub const RESULT_COUNT: &str = "ss_result_count";
    pub const REVIEW_DISMISSED: &str = "ss_review_dismissed";
}
