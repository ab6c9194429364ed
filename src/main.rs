// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SceneSniffer relay host
//!
//! Local service the extension talks to: stores the provider credential,
//! keeps its tier classification fresh and relays identification requests.

use scene_sniffer::{config::Config, routes::relay, store::FileStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        provider = ?config.provider,
        "Starting SceneSniffer relay"
    );

    let kv = FileStore::open(&config.store_path).await?;
    tracing::info!(path = %kv.path().display(), "Credential store opened");

    let state = Arc::new(AppState::new(config.clone(), Arc::new(kv))?);

    // Re-probe on start so the tier survives key changes made elsewhere.
    let startup_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = relay::refresh_tier(&startup_state).await {
            tracing::warn!(error = %e, "Startup tier probe failed");
        }
    });

    let app = scene_sniffer::routes::create_router(state);

    // Loopback only: the relay holds the user's credential.
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Relay listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scene_sniffer=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
