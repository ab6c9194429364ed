// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overlay UI: the in-page button, result panel and their state machine.
//!
//! The host DOM is reached through [`HostSurface`]; the relay through
//! [`RelayChannel`]. Nothing here touches the provider directly.

pub mod channel;
pub mod controller;
pub mod copy;
pub mod format;
pub mod review;
pub mod state;
pub mod surface;
pub mod watchdog;

pub use channel::{send_with_timeout, HttpRelayChannel, LocalRelayChannel, RelayChannel};
pub use controller::{AnalysisOutcome, KeyPress, Overlay};
pub use copy::friendly_error;
pub use format::{format_result, Inline, ResultLine};
pub use review::ReviewPolicy;
pub use state::{ErrorPanel, OverlayState, Panel, Phase, ResultPanel};
pub use surface::{HostPage, HostSurface, Notification, NotificationKind};
pub use watchdog::{spawn_watchdog, Reconciliation, WATCHDOG_PERIOD};
