// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Write side of the host page.

use super::state::Panel;
use crate::page::PageDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// A transient toast, separate from the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Only a page reload recovers from this condition
    pub requires_refresh: bool,
}

impl Notification {
    pub fn refresh_required() -> Self {
        Self {
            kind: NotificationKind::Error,
            message: "SceneSniffer was updated or reloaded. Please refresh the page to continue."
                .to_string(),
            requires_refresh: true,
        }
    }
}

/// The overlay's handle on the host DOM.
///
/// The host may remove injected elements at any time; the watchdog compares
/// `has_action_button` with the desired state and repairs it.
pub trait HostSurface: Send + Sync {
    fn has_action_button(&self) -> bool;

    fn insert_action_button(&self);

    fn remove_action_button(&self);

    /// Replace whatever panel is showing.
    fn show_panel(&self, panel: &Panel);

    fn clear_panel(&self);

    fn notify(&self, notification: &Notification);
}

/// A host page the overlay can both read and draw on.
pub trait HostPage: PageDocument + HostSurface {}

impl<T: PageDocument + HostSurface> HostPage for T {}
