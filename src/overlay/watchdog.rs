// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodic reconciliation of the injected UI.
//!
//! The host page re-renders and navigates client-side without telling us,
//! so instead of reacting to DOM events we compare desired and observed
//! state on a timer and repair the difference.

use super::controller::Overlay;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const WATCHDOG_PERIOD: Duration = Duration::from_secs(2);

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    InSync,
    Inserted,
    Removed,
}

/// Run `overlay.reconcile()` every `period` until the handle is aborted.
pub fn spawn_watchdog(overlay: Arc<Overlay>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match overlay.reconcile().await {
                Reconciliation::InSync => {}
                repair => tracing::debug!(?repair, "Watchdog repaired overlay"),
            }
        }
    })
}
