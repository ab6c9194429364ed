// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tier prober: classifies a credential as paid or free.
//!
//! One minimal request goes to the paid-only model. If the credential is
//! valid but lacks paid access, a second probe against the free model
//! decides whether it is usable at all.

use super::identify::ModelSelection;
use super::provider::{ProviderClient, ProviderResponse};
use crate::error::Result;
use crate::models::{KeyStatus, Tier, TierStatus};
use crate::store::CredentialStore;
use crate::time_utils::now_rfc3339;

/// Error-body fragments meaning "valid key, no paid access".
const NO_PAID_ACCESS_MARKERS: &[&str] = &["billing", "permission", "quota", "not enabled"];

/// Error-body fragments meaning the key itself was rejected.
const INVALID_KEY_MARKERS: &[&str] = &["api_key_invalid", "api key not valid"];

#[derive(Clone)]
pub struct TierProber {
    provider: ProviderClient,
    store: CredentialStore,
    models: ModelSelection,
}

impl TierProber {
    pub fn new(provider: ProviderClient, store: CredentialStore, models: ModelSelection) -> Self {
        Self {
            provider,
            store,
            models,
        }
    }

    /// Probe `credential`, persist the outcome and return it.
    ///
    /// Idempotent; only fails when the outcome cannot be persisted.
    pub async fn probe(&self, credential: &str) -> Result<TierStatus> {
        let mut status = self.classify(credential).await;
        status.checked_at = Some(now_rfc3339());

        self.store.set_tier_status(&status).await?;

        tracing::info!(
            tier = status.tier.as_str(),
            status = status.status.as_str(),
            "Credential probed"
        );
        Ok(status)
    }

    async fn classify(&self, credential: &str) -> TierStatus {
        let response = match self.provider.probe(credential, &self.models.paid).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Paid-tier probe failed to send");
                return TierStatus::unknown();
            }
        };

        let code = response.status.as_u16();
        if response.is_success() {
            return TierStatus::new(Tier::Paid, KeyStatus::Active);
        }
        if code == 401 || (code == 400 && body_mentions(&response, INVALID_KEY_MARKERS)) {
            return TierStatus::new(Tier::Free, KeyStatus::Invalid);
        }
        if code == 403 || code == 429 || body_mentions(&response, NO_PAID_ACCESS_MARKERS) {
            tracing::debug!(status = code, "No paid access, probing free tier");
            return self.probe_free(credential).await;
        }

        tracing::warn!(status = code, "Unexpected probe response");
        TierStatus::unknown()
    }

    async fn probe_free(&self, credential: &str) -> TierStatus {
        let status = match self.provider.probe(credential, &self.models.free).await {
            Ok(r) if r.is_success() => KeyStatus::Active,
            Ok(r) if matches!(r.status.as_u16(), 400 | 401) => KeyStatus::Invalid,
            Ok(_) => KeyStatus::Expired,
            Err(e) => {
                tracing::warn!(error = %e, "Free-tier probe failed to send");
                KeyStatus::Unknown
            }
        };
        TierStatus::new(Tier::Free, status)
    }
}

fn body_mentions(response: &ProviderResponse, markers: &[&str]) -> bool {
    let body = response.body.to_ascii_lowercase();
    markers.iter().any(|m| body.contains(m))
}
