// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identification client: prompt construction, retry and normalisation.

use super::prompt::PromptTemplate;
use super::provider::{GenerationRequest, ProviderClient, ProviderResponse};
use super::response::extract_text;
use super::retry::RetryPolicy;
use crate::config::ProviderKind;
use crate::error::{AppError, Result};
use crate::models::{IdentificationResult, Tier, VideoMetadata};
use crate::store::CredentialStore;

/// Models used for each tier.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    pub paid: String,
    pub free: String,
}

impl ModelSelection {
    pub fn for_tier(&self, tier: Tier) -> &str {
        match tier {
            Tier::Paid => &self.paid,
            Tier::Free => &self.free,
        }
    }
}

/// Identifies the source of a clip through the configured provider.
///
/// Reads the tier from the credential store but never writes to it; tier
/// detection is the prober's job.
#[derive(Clone)]
pub struct IdentificationClient {
    provider: ProviderClient,
    store: CredentialStore,
    models: ModelSelection,
    template: PromptTemplate,
    retry: RetryPolicy,
    include_thumbnail: bool,
}

impl IdentificationClient {
    pub fn new(
        provider: ProviderClient,
        store: CredentialStore,
        models: ModelSelection,
        template: PromptTemplate,
        retry: RetryPolicy,
        include_thumbnail: bool,
    ) -> Self {
        Self {
            provider,
            store,
            models,
            template,
            retry,
            include_thumbnail,
        }
    }

    /// Identify the movie or episode `metadata` describes.
    pub async fn identify(
        &self,
        metadata: &VideoMetadata,
        credential: &str,
    ) -> Result<IdentificationResult> {
        if credential.trim().is_empty() {
            return Err(AppError::NoCredential);
        }

        let tier = match self.store.tier_status().await {
            Ok(status) => status.tier,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read tier, assuming free");
                Tier::Free
            }
        };
        let model = self.models.for_tier(tier).to_string();
        let search = tier == Tier::Paid && self.provider.kind() == ProviderKind::Gemini;

        let image = match (&metadata.thumbnail_url, self.include_thumbnail) {
            (Some(url), true) => match self.provider.fetch_image(url).await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, "Thumbnail unavailable, sending text only");
                    None
                }
            },
            _ => None,
        };

        let request = GenerationRequest {
            system: Some(self.template.system.clone()).filter(|s| !s.is_empty()),
            prompt: self.template.render(metadata, image.is_some()),
            image,
            temperature: self.template.temperature,
            max_output_tokens: self.template.max_output_tokens,
            search,
        };

        tracing::info!(
            model = %model,
            tier = tier.as_str(),
            search,
            video_id = metadata.video_id.as_deref().unwrap_or(""),
            "Identifying clip"
        );

        let response = self.send_with_retry(credential, &model, &request).await?;

        let raw = response.json().ok_or_else(|| AppError::Api {
            status: response.status.as_u16(),
            message: "Malformed JSON response".to_string(),
        })?;
        let result = extract_text(&raw)?;

        Ok(IdentificationResult {
            result,
            raw,
            model: Some(model),
        })
    }

    /// Send `request`, retrying rate limits and transport failures with
    /// exponential backoff. Any other non-2xx fails immediately.
    async fn send_with_retry(
        &self,
        credential: &str,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<ProviderResponse> {
        let mut attempt = 0;
        loop {
            match self.provider.generate(credential, model, request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) if response.status.as_u16() == 429 => {
                    if !self.retry.should_retry(attempt) {
                        tracing::warn!(attempts = attempt + 1, "Rate limit retries exhausted");
                        return Err(AppError::RateLimited {
                            attempts: attempt + 1,
                        });
                    }
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Provider rate limit hit (429), backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => {
                    let err = response.into_api_error();
                    tracing::error!(error = %err, "Provider rejected request");
                    return Err(err);
                }
                Err(e) => {
                    if !self.retry.should_retry(attempt) {
                        return Err(AppError::Network(e.to_string()));
                    }
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Provider request failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
            attempt += 1;
        }
    }
}
