//! Polyglot Greeter — Entry Point
//!
//! Wiring sequence:
//! 1. Init tracing (JSON structured logging, RUST_LOG filter)
//! 2. Read PORT from env (default 8080)
//! 3. Build the greeting table and the metrics registry
//! 4. Spawn the self-pinger against the service's own base URL
//! 5. Bind the listener and serve greeting + /metrics routes
//!
//! Runs until the listener fails; no signal handling. A bind or
//! accept failure is logged with context and exits non-zero.

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;
use tracing::info;

use polyglot_greeter::adapters::http::{AppState, router};
use polyglot_greeter::adapters::metrics::MetricsRegistry;
use polyglot_greeter::config::AppConfig;
use polyglot_greeter::domain::GreetingTable;
use polyglot_greeter::usecases::SelfPinger;

/// Jitter ceiling between self-ping attempts.
const PING_JITTER: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let greetings = Arc::new(GreetingTable::with_defaults());
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to build metrics registry")?);

    // Shutdown channel exists for the pinger's sake; nothing sends on
    // it in production, the loop lives as long as the process.
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let pinger = SelfPinger::new(
        config.base_url(),
        greetings.languages(),
        Arc::clone(&metrics),
        StdRng::from_entropy(),
        PING_JITTER,
    );
    tokio::spawn(pinger.run(shutdown_rx));

    let app = router(AppState { greetings, metrics });

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    info!(port = config.port, "Starting server");

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    drop(shutdown_tx);
    Ok(())
}
