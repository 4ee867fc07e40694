//! # HQ Configuration
//!
//! Unified configuration for the runtime and the subsystems it wires.
//! Built once at startup (defaults plus environment overrides) and passed
//! into the container; the services never read configuration themselves.

use std::path::PathBuf;

use hq_community_fund::adapters::pool_api::PoolApiConfig;
use hq_community_fund::CommunityFundConfig;
use thiserror::Error;

/// Complete HQ runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct HqConfig {
    /// Pool API client configuration (base URL, network, timeouts).
    pub pool: PoolApiConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Community-fund service configuration.
    pub community_fund: CommunityFundConfig,
}

impl HqConfig {
    /// Validate configuration before wiring any service.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyPoolUrl);
        }
        if self.pool.network.trim().is_empty() {
            return Err(ConfigError::EmptyNetwork);
        }
        if self.pool.timeout_secs == 0 {
            return Err(ConfigError::ZeroPoolTimeout);
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if self.community_fund.max_intents_per_batch == 0 {
            return Err(ConfigError::ZeroBatchCeiling);
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Data directory; the vote database lives in a subdirectory.
    pub data_dir: PathBuf,
    /// fsync after each write. Disabled only for tests.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/hq"),
            sync_writes: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No pool node to talk to.
    #[error("Pool base URL must not be empty. Set HQ_POOL_URL.")]
    EmptyPoolUrl,

    /// Every pool call is scoped to a network.
    #[error("Pool network must not be empty. Set HQ_POOL_NETWORK.")]
    EmptyNetwork,

    /// A zero timeout would let a stalled pool hang a synchronization pass.
    #[error("Pool request timeout must be at least 1 second")]
    ZeroPoolTimeout,

    /// Nowhere to put the vote database.
    #[error("Data directory must not be empty. Set HQ_DATA_DIR.")]
    EmptyDataDir,

    /// A zero ceiling would reject every non-empty batch.
    #[error("max_intents_per_batch must be at least 1")]
    ZeroBatchCeiling,
}
