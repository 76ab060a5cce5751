//! Session Sweeper - Background deletion of expired session rows
//!
//! Runs the sweeper against the configured table and exposes a small status
//! API next to it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_sweeper::api::create_router;
use session_sweeper::store::SweepTarget;
use session_sweeper::{AppState, Config, SqliteSessionStore, Sweeper};

/// Main entry point for the session sweeper service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the database pool
/// 4. Start the background sweeper
/// 5. Serve the status API until SIGINT/SIGTERM
///
/// # Shutdown Sequence
/// HTTP server drains, then the sweeper is stopped and awaited, then the
/// pool is closed. Closing the pool last means no sweep can race teardown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_sweeper=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting session sweeper");

    let config = Config::from_env();
    info!(
        "Configuration loaded: table={}, expiry_column={}, sweep_interval={}s, port={}",
        config.session_table, config.expiry_column, config.sweep_interval, config.server_port
    );

    let target = SweepTarget::with_column(&config.session_table, &config.expiry_column)
        .context("invalid sweep target")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    let store = SqliteSessionStore::connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    let store = Arc::new(store);
    info!("Database pool opened");

    let sweeper = Sweeper::from_target(store.clone(), target);
    let run = sweeper.start(config.sweep_interval())?;

    let app = create_router(AppState::new(sweeper.clone()));
    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Teardown order holds even when the server failed
    let stopped = store.close_after(&sweeper, run).await;

    served.context("server error")?;
    stopped.context("sweeper did not stop cleanly")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
