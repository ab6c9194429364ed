// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: the API key plus its derived tier metadata.

use super::keys;
use super::KeyValueStore;
use crate::error::{AppError, Result};
use crate::models::{KeyStatus, Tier, TierStatus};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Typed access to the credential entries of a [`KeyValueStore`].
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Persist a new credential, replacing any previous one.
    ///
    /// Blank input fails with `EmptyCredential` and leaves storage untouched.
    pub async fn save(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::EmptyCredential);
        }

        self.kv
            .set_many(HashMap::from([(
                keys::API_KEY.to_string(),
                Value::String(key.to_string()),
            )]))
            .await?;

        tracing::info!("API key saved");
        Ok(())
    }

    /// The stored credential, if any.
    pub async fn get(&self) -> Result<Option<String>> {
        let mut values = self.kv.get_many(&[keys::API_KEY]).await?;
        Ok(values
            .remove(keys::API_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|v| !v.trim().is_empty()))
    }

    pub async fn get_many(&self, fields: &[&str]) -> Result<HashMap<String, Value>> {
        self.kv.get_many(fields).await
    }

    pub async fn set_many(&self, fields: HashMap<String, Value>) -> Result<()> {
        self.kv.set_many(fields).await
    }

    /// Last persisted probe outcome; `{free, unknown}` when nothing is stored.
    pub async fn tier_status(&self) -> Result<TierStatus> {
        let values = self
            .kv
            .get_many(&[keys::TIER, keys::STATUS, keys::CHECKED_AT])
            .await?;

        let text = |k: &str| values.get(k).and_then(Value::as_str);

        Ok(TierStatus {
            tier: text(keys::TIER).and_then(Tier::parse).unwrap_or_default(),
            status: text(keys::STATUS)
                .and_then(KeyStatus::parse)
                .unwrap_or_default(),
            checked_at: text(keys::CHECKED_AT).map(str::to_string),
        })
    }

    pub async fn set_tier_status(&self, status: &TierStatus) -> Result<()> {
        let mut fields = HashMap::from([
            (keys::TIER.to_string(), Value::from(status.tier.as_str())),
            (keys::STATUS.to_string(), Value::from(status.status.as_str())),
        ]);
        if let Some(at) = &status.checked_at {
            fields.insert(keys::CHECKED_AT.to_string(), Value::from(at.as_str()));
        }
        self.kv.set_many(fields).await
    }
}
