// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SceneSniffer: identify the movie or TV episode behind a short-form clip.
//!
//! This crate provides the relay host that stores the provider credential,
//! probes its tier and forwards identification prompts, plus the page
//! extraction, overlay and popup logic the extension UI drives.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod overlay;
pub mod page;
pub mod popup;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::{Config, ConfigError};
use services::{
    IdentificationClient, ModelSelection, PromptTemplate, ProviderClient, RetryPolicy, TierProber,
};
use std::sync::Arc;
use store::{CredentialStore, KeyValueStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: CredentialStore,
    pub prober: TierProber,
    pub identifier: IdentificationClient,
}

impl AppState {
    /// Wire the services for `config` on top of `kv`.
    pub fn new(config: Config, kv: Arc<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        let template = match &config.prompt_template_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading prompt template");
                PromptTemplate::load(path)?
            }
            None => PromptTemplate::default(),
        };

        let store = CredentialStore::new(kv);
        let provider = ProviderClient::new(config.provider, config.provider_base_url.clone());
        let models = ModelSelection {
            paid: config.paid_model.clone(),
            free: config.free_model.clone(),
        };

        let prober = TierProber::new(provider.clone(), store.clone(), models.clone());
        let identifier = IdentificationClient::new(
            provider,
            store.clone(),
            models,
            template,
            RetryPolicy::from_config(&config),
            config.include_thumbnail,
        );

        Ok(Self {
            config,
            store,
            prober,
            identifier,
        })
    }
}
