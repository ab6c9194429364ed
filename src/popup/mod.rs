// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Toolbar popup: key setup, key status and manual URL identification.
//!
//! Holds the popup's view state and talks to the relay through the same
//! [`RelayChannel`] as the overlay.

use crate::models::{KeyStatus, RelayReply, RelayRequest, Tier, TierStatus};
use crate::overlay::{friendly_error, send_with_timeout, RelayChannel};
use crate::page::{is_short_form, metadata_from_url};
use std::sync::Arc;
use std::time::Duration;

/// Which screen the popup shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// No key stored: key entry form
    #[default]
    Setup,
    /// Key stored: URL input, status, change key
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

/// Inline status line under the active form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// Human-readable key status, e.g. "Paid tier (active)".
pub fn describe_status(status: &TierStatus) -> String {
    let tier = match status.tier {
        Tier::Paid => "Paid tier",
        Tier::Free => "Free tier",
    };
    match status.status {
        KeyStatus::Active => format!("{} (active)", tier),
        KeyStatus::Expired => format!("{} (expired or restricted)", tier),
        KeyStatus::Invalid => "Invalid API key".to_string(),
        KeyStatus::Unknown => format!("{} (status unknown)", tier),
    }
}

pub struct Popup {
    channel: Arc<dyn RelayChannel>,
    timeout: Duration,
    view: View,
    key_input: String,
    key_visible: bool,
    url_input: String,
    key_status: Option<TierStatus>,
    result: Option<String>,
    message: Option<StatusMessage>,
}

impl Popup {
    pub fn new(channel: Arc<dyn RelayChannel>, timeout: Duration) -> Self {
        Self {
            channel,
            timeout,
            view: View::Setup,
            key_input: String::new(),
            key_visible: false,
            url_input: String::new(),
            key_status: None,
            result: None,
            message: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn key_status(&self) -> Option<&TierStatus> {
        self.key_status.as_ref()
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn set_key_input(&mut self, value: impl Into<String>) {
        self.key_input = value.into();
    }

    pub fn set_url_input(&mut self, value: impl Into<String>) {
        self.url_input = value.into();
    }

    /// The key field as rendered: masked unless visibility is toggled on.
    pub fn displayed_key(&self) -> String {
        if self.key_visible {
            self.key_input.clone()
        } else {
            "•".repeat(self.key_input.chars().count())
        }
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.key_visible = !self.key_visible;
        self.key_visible
    }

    /// Send one message; `{error}` replies and channel failures both come
    /// back as the message to show.
    async fn send(&self, request: RelayRequest) -> Result<RelayReply, String> {
        match send_with_timeout(self.channel.clone(), request, self.timeout).await {
            Ok(RelayReply::Error { error }) => Err(error),
            Ok(reply) => Ok(reply),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Pick the view from whether a key is stored.
    pub async fn open(&mut self) -> View {
        self.view = match self.send(RelayRequest::CheckApiKey).await {
            Ok(RelayReply::HasKey { has_key: true }) => View::Main,
            Ok(_) => View::Setup,
            Err(e) => {
                tracing::warn!(error = %e, "Could not check for a stored key");
                self.message = Some(StatusMessage::error(e));
                View::Setup
            }
        };

        if self.view == View::Main {
            self.load_status().await;
        }
        self.view
    }

    /// Save the key from the input field; on success switch to the main view.
    pub async fn save_key(&mut self) -> bool {
        let key = self.key_input.trim().to_string();
        if key.is_empty() {
            self.message = Some(StatusMessage::error("Please enter an API key"));
            return false;
        }

        match self.send(RelayRequest::SaveApiKey { api_key: key }).await {
            Ok(RelayReply::Saved {
                success: true,
                tier,
                status,
            }) => {
                let status = TierStatus::new(tier.unwrap_or_default(), status.unwrap_or_default());
                self.message = Some(StatusMessage::success(format!(
                    "API key saved. {}",
                    describe_status(&status)
                )));
                self.key_status = Some(status);
                self.key_input.clear();
                self.key_visible = false;
                self.view = View::Main;
                true
            }
            Ok(other) => {
                tracing::warn!(reply = ?other, "Unexpected reply to saveApiKey");
                self.message = Some(StatusMessage::error("Failed to save API key"));
                false
            }
            Err(e) => {
                self.message = Some(StatusMessage::error(e));
                false
            }
        }
    }

    /// Back to the setup form, pre-filled (masked) with the current key.
    pub async fn change_key(&mut self) {
        match self.send(RelayRequest::GetApiKey).await {
            Ok(RelayReply::ApiKey { api_key }) => self.key_input = api_key,
            Ok(_) => self.key_input.clear(),
            Err(e) => {
                tracing::debug!(error = %e, "No key to pre-fill");
                self.key_input.clear();
            }
        }
        self.key_visible = false;
        self.message = None;
        self.view = View::Setup;
    }

    /// Last persisted classification.
    pub async fn load_status(&mut self) {
        match self.send(RelayRequest::GetKeyStatus).await {
            Ok(RelayReply::KeyStatus(status)) => self.key_status = Some(status),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Could not load key status"),
        }
    }

    /// Re-probe the stored key.
    pub async fn refresh_status(&mut self) {
        match self.send(RelayRequest::ValidateKey).await {
            Ok(RelayReply::KeyStatus(status)) => {
                self.message = Some(StatusMessage::success(describe_status(&status)));
                self.key_status = Some(status);
            }
            Ok(_) => {}
            Err(e) => self.message = Some(StatusMessage::error(e)),
        }
    }

    /// Identify the URL typed into the main view.
    pub async fn identify_url(&mut self) -> bool {
        let url = self.url_input.trim().to_string();
        self.result = None;
        if url.is_empty() {
            self.message = Some(StatusMessage::error("Please enter a YouTube Shorts URL."));
            return false;
        }
        if !is_short_form(&url) {
            self.message = Some(StatusMessage::error(
                "That doesn't look like a YouTube Shorts URL.",
            ));
            return false;
        }

        self.message = Some(StatusMessage {
            kind: MessageKind::Info,
            text: "Analyzing...".to_string(),
        });

        let data = metadata_from_url(&url);
        match self.send(RelayRequest::IdentifyEpisode { data }).await {
            Ok(RelayReply::Identified(result)) => {
                self.result = Some(result.result);
                self.message = None;
                true
            }
            Ok(other) => {
                tracing::warn!(reply = ?other, "Unexpected reply to identifyEpisode");
                self.message = Some(StatusMessage::error("Unexpected reply. Please try again."));
                false
            }
            Err(e) => {
                self.message = Some(StatusMessage::error(friendly_error(&e)));
                false
            }
        }
    }
}
