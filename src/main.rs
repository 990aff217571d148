//! Larder ingredients service.
//!
//! Main entry point: initializes tracing, loads configuration, creates the
//! bounded connection pool, and serves the HTTP API until shutdown.

use anyhow::{Context, Result};
use larder_api::{
    config::{POOL_MAX_CONNECTIONS, POOL_MIN_CONNECTIONS},
    AppState, Config,
};
use larder_core::Storage;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting larder ingredients service");

    // Fail fast on missing credentials; there are no embedded defaults.
    let config = Config::load()?;
    let addr = config.parse_server_addr()?;
    info!(
        db_host = %config.db_host,
        db_name = %config.db_name,
        server_addr = %addr,
        "Configuration loaded"
    );

    // The pool is created once here and owned explicitly; handlers receive
    // it through state, never through globals.
    let pool = config.create_pool()?;
    info!(
        min_connections = POOL_MIN_CONNECTIONS,
        max_connections = POOL_MAX_CONNECTIONS,
        "Database connection pool created"
    );

    let state = AppState { storage: Storage::new(pool.clone()) };

    larder_api::start_server(state, addr).await.context("server failed")?;

    // Shutdown-only teardown; the server has drained by the time we get
    // here, so no connections are outstanding.
    pool.close().await;
    info!("Connection pool closed");

    info!("larder shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,larder=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
