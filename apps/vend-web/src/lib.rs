//! # vend-web: HTTP Adapter for Vendor Pro
//!
//! Serves the machine over JSON. All rules live in `vend-core`; this crate
//! only translates requests, holds the shared machine and triggers saves.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,vend=debug (override with RUST_LOG)                 │
//! │                                                                         │
//! │  2. Load WebConfig ───────────────────────────────────────────────────► │
//! │     • defaults → vend.toml → VEND_* env → validate                      │
//! │                                                                         │
//! │  3. Bootstrap Machine ────────────────────────────────────────────────► │
//! │     • load snapshot, or fall back to defaults and save them             │
//! │                                                                         │
//! │  4. Serve ────────────────────────────────────────────────────────────► │
//! │     • axum on server.bind_addr:server.port                              │
//! │     • Ctrl+C / SIGTERM → stop accepting, save snapshot, exit            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vend_core::Machine;
use vend_store::{bootstrap, JsonFileStore, LoadOutcome, StoreConfig};

use crate::config::WebConfig;
use crate::state::AppState;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vend=trace` - Show trace for vend crates only
/// - Default: `info,vend=debug`
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vend=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds the shared state: machine (restored or default) plus store.
pub fn build_state(config: WebConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    if !config.storage.persist {
        warn!("Persistence disabled, state will be lost on exit");
        return Ok(AppState::in_memory(config));
    }

    let store_config = match &config.storage.state_path {
        Some(path) => StoreConfig::new(path),
        None => StoreConfig::default_location()?,
    }
    .pretty(config.storage.pretty);

    let mut store = JsonFileStore::new(store_config);
    info!(path = %store.path().display(), "Using snapshot file");

    let (machine, outcome): (Machine, LoadOutcome) =
        bootstrap(&mut store, config.machine_config());
    if let LoadOutcome::Defaulted(reason) = &outcome {
        info!(reason = %reason, "Started from the default catalog");
    }

    Ok(AppState::new(machine, Some(store), config))
}

/// Runs the HTTP server until a shutdown signal, then saves.
pub async fn run(config: WebConfig) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = config.server.bind_address();
    let state = build_state(config)?;
    let app = routes::router(state.clone());

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Vendor Pro listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(warning) = state.persist_now().await {
        error!(warning = %warning, "Final save failed");
    }
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
