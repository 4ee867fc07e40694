//! # Pool HQ Runtime
//!
//! The main entry point for the Pool HQ backend.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration (defaults + `HQ_*` environment overrides)
//! 3. Validate configuration
//! 4. Wire the service container (vote store, address book, pool client)
//! 5. Probe pool reachability (informational, never fatal)
//! 6. Run until Ctrl+C

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use hq_runtime::container::{HqConfig, ServiceContainer};

/// Load configuration from defaults and environment.
fn load_config() -> HqConfig {
    let mut config = HqConfig::default();

    if let Ok(url) = std::env::var("HQ_POOL_URL") {
        config.pool.base_url = url;
    }
    if let Ok(network) = std::env::var("HQ_POOL_NETWORK") {
        config.pool.network = network;
    }
    if let Ok(timeout) = std::env::var("HQ_POOL_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.parse() {
            config.pool.timeout_secs = secs;
        } else {
            warn!("HQ_POOL_TIMEOUT_SECS must be an integer, keeping default");
        }
    }
    if let Ok(dir) = std::env::var("HQ_DATA_DIR") {
        config.storage.data_dir = dir.into();
    }
    if let Ok(max) = std::env::var("HQ_MAX_BATCH") {
        if let Ok(n) = max.parse() {
            config.community_fund.max_intents_per_batch = n;
        } else {
            warn!("HQ_MAX_BATCH must be an integer, keeping default");
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config();
    config.validate().context("invalid configuration")?;

    info!("===========================================");
    info!("  Pool HQ Runtime v0.1.0");
    info!("  Network: {}", config.pool.network);
    info!("===========================================");

    let container = ServiceContainer::new(config).context("failed to wire services")?;

    // Votes submitted while the pool is down stay uncommitted and are
    // re-cast by later synchronization passes, so this is not fatal.
    if container.pool.is_reachable().await {
        info!(
            "[hq-runtime] Pool at {} is reachable",
            container.config.pool.base_url
        );
    } else {
        warn!(
            "[hq-runtime] Pool at {} is not reachable, votes will stay uncommitted until it is",
            container.config.pool.base_url
        );
    }

    info!("[hq-runtime] HQ is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!("[hq-runtime] Shutting down");
    Ok(())
}
