//! # Service Container
//!
//! Central container assembling the community-fund service from its
//! production adapters, with explicit dependency injection. Configuration
//! is passed in once; nothing here reads global state.

pub mod config;

pub use config::{ConfigError, HqConfig, StorageConfig};

use std::sync::Arc;

use anyhow::{Context, Result};
use hq_community_fund::adapters::pool_api::PoolApiClient;
use hq_community_fund::CommunityFundService;
use tracing::info;

use crate::adapters::addresses::StoredAddressResolver;
use crate::adapters::storage::{RocksDbConfig, RocksDbVoteStore};

/// The fully wired community-fund engine.
pub type CommunityFundEngine =
    CommunityFundService<RocksDbVoteStore, StoredAddressResolver, PoolApiClient>;

/// Container holding the wired services and their shared adapters.
pub struct ServiceContainer {
    /// Runtime configuration the container was built from.
    pub config: HqConfig,
    /// Durable vote storage, shared with the address book.
    pub store: Arc<RocksDbVoteStore>,
    /// Address book over the same database.
    pub addresses: Arc<StoredAddressResolver>,
    /// Pool API client, also used for the startup reachability probe.
    pub pool: Arc<PoolApiClient>,
    /// The community-fund synchronization service.
    pub community_fund: Arc<CommunityFundEngine>,
}

impl ServiceContainer {
    /// Wire all services from configuration.
    ///
    /// Opens the database and builds the HTTP client; neither touches the
    /// network, so construction succeeds even with the pool offline.
    pub fn new(config: HqConfig) -> Result<Self> {
        let db_path = config.storage.data_dir.join("rocksdb");
        let rocks_config = RocksDbConfig {
            path: db_path.to_string_lossy().to_string(),
            sync_writes: config.storage.sync_writes,
            ..Default::default()
        };

        let store = Arc::new(
            RocksDbVoteStore::open(rocks_config)
                .with_context(|| format!("failed to open vote store at {:?}", db_path))?,
        );
        let addresses = Arc::new(StoredAddressResolver::new(store.handle()));
        let pool = Arc::new(
            PoolApiClient::new(config.pool.clone()).context("failed to build pool API client")?,
        );

        let community_fund = Arc::new(CommunityFundService::new(
            config.community_fund.clone(),
            Arc::clone(&store),
            Arc::clone(&addresses),
            Arc::clone(&pool),
        ));

        info!(
            "[hq-runtime] Services wired: store={:?}, pool={} ({})",
            db_path, config.pool.base_url, config.pool.network
        );

        Ok(Self {
            config,
            store,
            addresses,
            pool,
            community_fund,
        })
    }
}
