// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The overlay controller: triggers in, panels out.

use super::channel::{send_with_timeout, RelayChannel};
use super::copy::friendly_error;
use super::format::format_result;
use super::review::ReviewPolicy;
use super::state::{OverlayState, Panel, Phase, ResultPanel};
use super::surface::{HostPage, Notification};
use super::watchdog::Reconciliation;
use crate::models::{IdentificationResult, RelayReply, RelayRequest};
use crate::page::{extract_metadata, extract_video_id, is_short_form};
use crate::store::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A keyboard event as seen by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn alt(key: char) -> Self {
        Self {
            key,
            alt: true,
            ctrl: false,
            meta: false,
        }
    }

    /// Alt+I, without other modifiers.
    pub fn is_identify_shortcut(&self) -> bool {
        self.alt && !self.ctrl && !self.meta && self.key.eq_ignore_ascii_case(&'i')
    }
}

/// What a trigger did.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// A request was already in flight, or the trigger did not apply.
    Ignored,
    Rendered(Panel),
    /// The relay is gone; the user was told to reload the page.
    ReloadRequired,
}

/// One overlay instance per host page.
pub struct Overlay {
    page: Arc<dyn HostPage>,
    channel: Arc<dyn RelayChannel>,
    local: Arc<dyn KeyValueStore>,
    review: ReviewPolicy,
    timeout: Duration,
    state: Mutex<OverlayState>,
}

impl Overlay {
    /// `local` is the page-local store holding the review counter.
    pub fn new(
        page: Arc<dyn HostPage>,
        channel: Arc<dyn RelayChannel>,
        local: Arc<dyn KeyValueStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            page,
            channel,
            local,
            review: ReviewPolicy::default(),
            timeout,
            state: Mutex::new(OverlayState::default()),
        }
    }

    pub fn with_review_policy(mut self, review: ReviewPolicy) -> Self {
        self.review = review;
        self
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase().clone()
    }

    /// Action button click.
    pub async fn click(&self) -> AnalysisOutcome {
        self.analyze().await
    }

    /// Keyboard shortcut; only acts on short-form pages.
    pub async fn on_key(&self, key: KeyPress) -> AnalysisOutcome {
        if !key.is_identify_shortcut() || !is_short_form(&self.page.url()) {
            return AnalysisOutcome::Ignored;
        }
        self.analyze().await
    }

    /// Retry from the error panel.
    pub async fn retry(&self) -> AnalysisOutcome {
        if !matches!(self.phase().await, Phase::Error(_)) {
            return AnalysisOutcome::Ignored;
        }
        self.analyze().await
    }

    /// Re-analyze from a result that belongs to a previous video.
    pub async fn reanalyze(&self) -> AnalysisOutcome {
        match self.phase().await {
            Phase::Result(panel) if panel.offers_reanalyze() => self.analyze().await,
            _ => AnalysisOutcome::Ignored,
        }
    }

    /// Close the result or error panel.
    pub async fn dismiss(&self) -> bool {
        let closed = self.state.lock().await.dismiss();
        if closed {
            self.page.clear_panel();
        }
        closed
    }

    /// Close the review banner; it then only returns on the interval.
    pub async fn dismiss_review(&self) {
        if let Err(e) = self.review.dismiss(&*self.local).await {
            tracing::warn!(error = %e, "Failed to persist review dismissal");
        }
        if let Some(panel) = self.state.lock().await.hide_review_prompt() {
            self.page.show_panel(&panel);
        }
    }

    /// One identification cycle. A trigger while one is in flight is a
    /// no-op and sends nothing.
    async fn analyze(&self) -> AnalysisOutcome {
        let url = self.page.url();
        let video_id = extract_video_id(&url);
        {
            let mut state = self.state.lock().await;
            state.observe_url(&url);
            if !state.begin(video_id.clone()) {
                tracing::debug!("Identification already in flight, ignoring trigger");
                return AnalysisOutcome::Ignored;
            }
        }
        self.page.show_panel(&Panel::Loading);

        let metadata = extract_metadata(&*self.page);
        tracing::info!(video_id = ?metadata.video_id, "Requesting identification");

        let reply = send_with_timeout(
            self.channel.clone(),
            RelayRequest::IdentifyEpisode { data: metadata },
            self.timeout,
        )
        .await;

        match reply {
            Ok(RelayReply::Identified(result)) => self.show_result(result, video_id).await,
            Ok(RelayReply::Error { error }) => self.show_error(friendly_error(&error)).await,
            Ok(other) => {
                tracing::warn!(reply = ?other, "Unexpected relay reply to identifyEpisode");
                self.show_error("Unexpected reply. Please try again.".to_string())
                    .await
            }
            Err(e) if e.requires_reload() => {
                self.state.lock().await.abandon();
                self.page.clear_panel();
                self.page.notify(&Notification::refresh_required());
                AnalysisOutcome::ReloadRequired
            }
            Err(e) => self.show_error(friendly_error(&e.to_string())).await,
        }
    }

    async fn show_result(
        &self,
        result: IdentificationResult,
        video_id: Option<String>,
    ) -> AnalysisOutcome {
        let show_review_prompt = match self.review.record_result(&*self.local).await {
            Ok(show) => show,
            Err(e) => {
                tracing::warn!(error = %e, "Review counter unavailable");
                false
            }
        };

        let panel = ResultPanel {
            lines: format_result(&result.result),
            text: result.result,
            model: result.model,
            video_id,
            is_previous_video: false,
            show_review_prompt,
        };

        let panel = {
            let mut state = self.state.lock().await;
            state.observe_url(&self.page.url());
            state.finish_with_result(panel)
        };
        self.page.show_panel(&panel);
        AnalysisOutcome::Rendered(panel)
    }

    async fn show_error(&self, message: String) -> AnalysisOutcome {
        let panel = self.state.lock().await.finish_with_error(message);
        self.page.show_panel(&panel);
        AnalysisOutcome::Rendered(panel)
    }

    /// Bring the page in line with the desired state: action button present
    /// iff on a short-form page, "Previous video" marker current.
    pub async fn reconcile(&self) -> Reconciliation {
        let url = self.page.url();
        if let Some(panel) = self.state.lock().await.observe_url(&url) {
            self.page.show_panel(&panel);
        }

        match (is_short_form(&url), self.page.has_action_button()) {
            (true, false) => {
                self.page.insert_action_button();
                Reconciliation::Inserted
            }
            (false, true) => {
                self.page.remove_action_button();
                Reconciliation::Removed
            }
            _ => Reconciliation::InSync,
        }
    }
}
