// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! When to ask for a store review.

use crate::error::Result;
use crate::store::{keys, KeyValueStore};
use serde_json::Value;
use std::collections::HashMap;

/// Show the banner from the `threshold`th result; once dismissed, only on
/// every `interval`th.
#[derive(Debug, Clone, Copy)]
pub struct ReviewPolicy {
    pub threshold: u64,
    pub interval: u64,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            threshold: 5,
            interval: 20,
        }
    }
}

impl ReviewPolicy {
    pub fn should_show(&self, count: u64, dismissed: bool) -> bool {
        if dismissed {
            self.interval > 0 && count % self.interval == 0
        } else {
            count >= self.threshold
        }
    }

    /// Count one more successful result and decide on the banner.
    pub async fn record_result(&self, kv: &dyn KeyValueStore) -> Result<bool> {
        let stored = kv
            .get_many(&[keys::RESULT_COUNT, keys::REVIEW_DISMISSED])
            .await?;
        let count = stored
            .get(keys::RESULT_COUNT)
            .and_then(Value::as_u64)
            .unwrap_or(0)
            + 1;
        let dismissed = stored
            .get(keys::REVIEW_DISMISSED)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        kv.set_many(HashMap::from([(
            keys::RESULT_COUNT.to_string(),
            Value::from(count),
        )]))
        .await?;

        Ok(self.should_show(count, dismissed))
    }

    pub async fn dismiss(&self, kv: &dyn KeyValueStore) -> Result<()> {
        kv.set_many(HashMap::from([(
            keys::REVIEW_DISMISSED.to_string(),
            Value::Bool(true),
        )]))
        .await
    }
}
