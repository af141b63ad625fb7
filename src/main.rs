//! Mini Grid - A minimal distributed key-value cache
//!
//! Runs the put/get demonstration for the configured cache role.

use std::env;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_grid::config::FALLBACK_TRACING_FILTER;
use mini_grid::{CacheHandle, Config, Runner};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Resolve configuration from environment variables
/// 2. Initialize tracing to stderr, honouring RUST_LOG or the grid log level
/// 3. Bootstrap the cache and run the round trip
/// 4. Server-side roles keep serving until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let default_directive = config
        .as_ref()
        .map(Config::tracing_filter)
        .unwrap_or_else(|_| FALLBACK_TRACING_FILTER.to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config.context("Failed to resolve grid configuration")?;
    info!(
        "Configuration loaded: role={}, cache_server_port={}, locator_port={}, log_level={}",
        config.role, config.cache_server_port, config.locator_port, config.log_level
    );

    let runner = Runner::new(Some(env::args().skip(1).collect()), config)?;
    let report = match runner.run().await {
        Ok(report) => report,
        Err(e) if e.is_fatal_startup() => {
            return Err(anyhow::Error::new(e).context("Grid failed to start"))
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Grid run failed")),
    };

    if report.role.is_server_side() {
        info!("Serving until shutdown signal");
        shutdown_signal().await;
        stop_servers(&report.cache).await;
    }

    Ok(())
}

async fn stop_servers(cache: &CacheHandle) {
    for server in cache.cache_servers() {
        server.stop().await;
    }
    info!("Shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
