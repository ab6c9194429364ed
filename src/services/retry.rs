// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded exponential backoff shared by every provider call that retries.

use crate::config::Config;
use std::time::Duration;

/// Backoff policy: `max_attempts` total tries, waiting `base × 2^attempt`
/// after the failed attempt numbered `attempt` (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.backoff_base,
        }
    }

    /// Whether another attempt is allowed after `attempt` failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// Wait before the attempt following `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        // Cap the shift; past 2^16 the delay is already absurd.
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}
