//! Callback Relay server.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env`)
//! - Serves the relay routes
//! - Sweeps expired pending sessions in the background
//!
//! # Usage
//!
//! ```bash
//! CLIENT_ID=... CLIENT_SECRET=... REDIRECT_URI=https://relay.example.com/auth/google/callback \
//!     cargo run --bin callback-relay
//! ```

use anyhow::Context;
use callback_relay::{RelayServerConfig, build_relay, build_router};
use callback_relay_auth::{InMemorySessionStore, spawn_expiry_sweeper};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,callback_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayServerConfig::from_env().context("Invalid configuration")?;
    info!(
        payload_mode = %config.payload_mode,
        pending_ttl_secs = config.pending_ttl.as_secs(),
        redirect_uri = %config.redirect_uri,
        "Configuration loaded"
    );

    let sessions = InMemorySessionStore::new();
    let relay = build_relay(&config, sessions.clone()).context("Failed to build relay")?;
    let sweeper = spawn_expiry_sweeper(sessions, config.sweep_interval);

    let app = build_router(Arc::new(relay));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
