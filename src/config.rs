// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Relay configuration loaded from environment variables.
//!
//! A `.env` file next to the binary is honoured for local setups. Nothing
//! here is secret: the provider credential lives in the credential store.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which provider API shape the relay speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Google Generative Language API (`generateContent`, key in query string).
    Gemini,
    /// OpenAI-compatible gateway (`chat/completions`, bearer credential).
    OpenAiCompatible,
}

impl ProviderKind {
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::OpenAiCompatible => "https://api.aimlapi.com/v1",
        }
    }

    pub fn default_models(self) -> (&'static str, &'static str) {
        match self {
            ProviderKind::Gemini => ("gemini-2.5-pro", "gemini-2.5-flash"),
            ProviderKind::OpenAiCompatible => {
                ("google/gemini-2.5-pro-preview", "google/gemini-2.5-flash")
            }
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "openai-compatible" | "aimlapi" => Ok(ProviderKind::OpenAiCompatible),
            _ => Err(ConfigError::Invalid("PROVIDER", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay listen port
    pub port: u16,
    /// Provider API shape
    pub provider: ProviderKind,
    /// Provider base URL (overridable for gateways and tests)
    pub provider_base_url: String,
    /// Model used for paid-tier credentials; also the probe target
    pub paid_model: String,
    /// Model used for free-tier credentials
    pub free_model: String,
    /// Total attempts for a rate-limited identification
    pub max_attempts: u32,
    /// Base of the exponential backoff, doubled per attempt
    pub backoff_base: Duration,
    /// JSON file backing the credential store
    pub store_path: PathBuf,
    /// Bearer token the extension must present, if set
    pub relay_token: Option<String>,
    /// Extension origin allowed by CORS (e.g. `chrome-extension://<id>`)
    pub extension_origin: Option<String>,
    /// How long a UI caller waits for a relay reply
    pub relay_timeout: Duration,
    /// Optional JSON prompt template override
    pub prompt_template_path: Option<PathBuf>,
    /// Attach the video thumbnail as an inline image
    pub include_thumbnail: bool,
}

impl Config {
    /// Config for tests: Gemini shape, millisecond backoff, no thumbnail fetch.
    pub fn test_default() -> Self {
        let (paid, free) = ProviderKind::Gemini.default_models();
        Self {
            port: 8787,
            provider: ProviderKind::Gemini,
            provider_base_url: "http://127.0.0.1:9".to_string(),
            paid_model: paid.to_string(),
            free_model: free.to_string(),
            max_attempts: 3,
            backoff_base: Duration::from_millis(5),
            store_path: env::temp_dir().join("scene_sniffer_test_store.json"),
            relay_token: None,
            extension_origin: None,
            relay_timeout: Duration::from_secs(60),
            prompt_template_path: None,
            include_thumbnail: false,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let provider: ProviderKind = env::var("PROVIDER")
            .unwrap_or_else(|_| "gemini".to_string())
            .parse()?;
        let (paid, free) = provider.default_models();

        Ok(Self {
            port: parse_or("PORT", 8787)?,
            provider,
            provider_base_url: env::var("PROVIDER_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| provider.default_base_url().to_string()),
            paid_model: env::var("PAID_MODEL").unwrap_or_else(|_| paid.to_string()),
            free_model: env::var("FREE_MODEL").unwrap_or_else(|_| free.to_string()),
            max_attempts: parse_or("MAX_ATTEMPTS", 3u32)?.max(1),
            backoff_base: Duration::from_millis(parse_or("BACKOFF_BASE_MS", 1000u64)?),
            store_path: env::var("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("scene_sniffer_store.json")),
            relay_token: env::var("RELAY_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            extension_origin: env::var("EXTENSION_ORIGIN").ok(),
            relay_timeout: Duration::from_secs(parse_or("RELAY_TIMEOUT_SECS", 60u64)?),
            prompt_template_path: env::var("PROMPT_TEMPLATE_PATH").ok().map(PathBuf::from),
            include_thumbnail: parse_or("INCLUDE_THUMBNAIL", true)?,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),

    #[error("Prompt template error: {0}")]
    PromptTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("PROVIDER", "openai");
        env::set_var("MAX_ATTEMPTS", "5");
        env::set_var("PROVIDER_BASE_URL", "http://localhost:4000/v1/");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.provider, ProviderKind::OpenAiCompatible);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.provider_base_url, "http://localhost:4000/v1");
        assert_eq!(config.paid_model, "google/gemini-2.5-pro-preview");
        assert_eq!(config.relay_timeout, Duration::from_secs(60));

        env::remove_var("PROVIDER");
        env::remove_var("MAX_ATTEMPTS");
        env::remove_var("PROVIDER_BASE_URL");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!("bard".parse::<ProviderKind>().is_err());
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    }
}
