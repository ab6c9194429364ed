// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overlay state machine: `Idle -> Analyzing -> {Result | Error} -> Idle`.

use super::format::{recognized_labels, ResultLine};
use crate::page::extract_video_id;

/// The result panel's content.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPanel {
    pub lines: Vec<ResultLine>,
    pub text: String,
    pub model: Option<String>,
    /// Video the result belongs to
    pub video_id: Option<String>,
    /// The page has moved on to another video since the result arrived
    pub is_previous_video: bool,
    pub show_review_prompt: bool,
}

impl ResultPanel {
    /// A stale result offers a re-analyze action.
    pub fn offers_reanalyze(&self) -> bool {
        self.is_previous_video
    }

    pub fn labels(&self) -> Vec<&'static str> {
        recognized_labels(&self.lines)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub message: String,
}

/// What the overlay is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Loading,
    Result(ResultPanel),
    Error(ErrorPanel),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Analyzing {
        video_id: Option<String>,
    },
    Result(ResultPanel),
    Error(ErrorPanel),
}

/// Per-page overlay state.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    phase: Phase,
    current_url: String,
}

impl OverlayState {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, Phase::Analyzing { .. })
    }

    /// Enter `Analyzing`. Returns false (and changes nothing) if a request
    /// is already in flight.
    pub fn begin(&mut self, video_id: Option<String>) -> bool {
        if self.is_analyzing() {
            return false;
        }
        self.phase = Phase::Analyzing { video_id };
        true
    }

    /// Leave `Analyzing` with a result, flagging it stale if the page has
    /// already moved on.
    pub fn finish_with_result(&mut self, mut panel: ResultPanel) -> Panel {
        panel.is_previous_video = self.differs_from_current(panel.video_id.as_deref());
        self.phase = Phase::Result(panel.clone());
        Panel::Result(panel)
    }

    pub fn finish_with_error(&mut self, message: String) -> Panel {
        let panel = ErrorPanel { message };
        self.phase = Phase::Error(panel.clone());
        Panel::Error(panel)
    }

    /// Back to `Idle` without a panel (torn-down channel).
    pub fn abandon(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Close a result or error panel. Refused while analyzing.
    pub fn dismiss(&mut self) -> bool {
        match self.phase {
            Phase::Result(_) | Phase::Error(_) => {
                self.phase = Phase::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn hide_review_prompt(&mut self) -> Option<Panel> {
        match &mut self.phase {
            Phase::Result(panel) if panel.show_review_prompt => {
                panel.show_review_prompt = false;
                Some(Panel::Result(panel.clone()))
            }
            _ => None,
        }
    }

    /// Record the page URL. When it changed and a result is showing, returns
    /// the panel with its "Previous video" marker refreshed.
    pub fn observe_url(&mut self, url: &str) -> Option<Panel> {
        if self.current_url == url {
            return None;
        }
        self.current_url = url.to_string();

        let current = extract_video_id(url);
        match &mut self.phase {
            Phase::Result(panel) => {
                let stale = panel.video_id.is_some() && panel.video_id != current;
                if stale == panel.is_previous_video {
                    return None;
                }
                panel.is_previous_video = stale;
                Some(Panel::Result(panel.clone()))
            }
            _ => None,
        }
    }

    fn differs_from_current(&self, video_id: Option<&str>) -> bool {
        if self.current_url.is_empty() {
            return false;
        }
        match video_id {
            Some(id) => extract_video_id(&self.current_url).as_deref() != Some(id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_for(video_id: &str) -> ResultPanel {
        ResultPanel {
            lines: Vec::new(),
            text: "Heat (1995)".to_string(),
            model: None,
            video_id: Some(video_id.to_string()),
            is_previous_video: false,
            show_review_prompt: false,
        }
    }

    #[test]
    fn test_single_flight() {
        let mut state = OverlayState::default();
        assert!(state.begin(Some("abc".to_string())));
        assert!(!state.begin(Some("abc".to_string())));
        assert!(!state.dismiss());

        state.finish_with_error("boom".to_string());
        assert!(state.begin(None));
    }

    #[test]
    fn test_navigation_marks_previous_video() {
        let mut state = OverlayState::default();
        state.observe_url("https://www.youtube.com/shorts/abc123");
        state.begin(Some("abc123".to_string()));
        state.finish_with_result(result_for("abc123"));

        let panel = state.observe_url("https://www.youtube.com/shorts/def456");
        match panel {
            Some(Panel::Result(p)) => assert!(p.offers_reanalyze()),
            other => panic!("expected refreshed result panel, got {:?}", other),
        }

        // Navigating back clears the marker.
        let panel = state.observe_url("https://www.youtube.com/shorts/abc123");
        assert!(matches!(panel, Some(Panel::Result(p)) if !p.is_previous_video));
    }

    #[test]
    fn test_result_arriving_after_navigation_is_stale() {
        let mut state = OverlayState::default();
        state.observe_url("https://www.youtube.com/shorts/abc123");
        state.begin(Some("abc123".to_string()));
        state.observe_url("https://www.youtube.com/shorts/zzz999");

        let Panel::Result(panel) = state.finish_with_result(result_for("abc123")) else {
            panic!("expected result panel");
        };
        assert!(panel.is_previous_video);
    }
}
