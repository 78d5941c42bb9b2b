//! Proxy Cache - A caching proxy in front of a remote key-value store
//!
//! Serves the HTTP API, or a line-based console when `APP_MODE=2`.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proxy_cache::api::{create_router, AppState};
use proxy_cache::config::{AppMode, Config};
use proxy_cache::console::run_console;
use proxy_cache::spawn_expiry_task;

/// Main entry point for the caching proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the proxy: local cache, remote store, access control
/// 4. Start the background TTL expiry task
/// 5. Run the console, or serve HTTP until SIGINT/SIGTERM
/// 6. Stop the expiry task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proxy_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting caching proxy");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        remote = config.remote_url.as_deref().unwrap_or("in-process"),
        max_keys = config.max_keys(),
        key_timeout_secs = config.key_timeout().as_secs(),
        client_limit = ?config.proxy_client_limit,
        auth_enabled = !config.disable_auth,
        port = config.port,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config).context("failed to build proxy")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let expiry_handle = spawn_expiry_task(state.proxy.cache().clone(), shutdown_rx);

    match config.mode {
        AppMode::Console => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_console(&state.proxy, stdin, tokio::io::stdout())
                .await
                .context("console I/O failed")?;
        }
        AppMode::Http => {
            let app = create_router(state, config.proxy_client_limit);

            let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            info!("Server listening on http://{}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("server error")?;
        }
    }

    // Stop the expiry task
    let _ = shutdown_tx.send(true);
    if let Some(handle) = expiry_handle {
        if let Err(e) = handle.await {
            warn!(error = %e, "TTL expiry task ended abnormally");
        }
    }

    info!("Proxy shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
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
