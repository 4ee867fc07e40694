//! # RocksDB Vote Store
//!
//! Production implementation of the [`VoteStore`] port.
//!
//! ## Key Layout
//!
//! - `vote:{user}:{type}:{hash}` - one bincode-encoded [`Vote`] per ballot
//! - `addr:{user}` - the user's address list (written by the address book
//!   adapter sharing this database)
//!
//! ## Atomicity
//!
//! `upsert_batch` goes through a single `WriteBatch`, so a batch lands
//! completely or not at all, and concurrent batches writing the same
//! ballot interleave per key instead of producing duplicate rows.

use std::sync::Arc;

use hq_community_fund::ports::outbound::VoteStore;
use hq_community_fund::{Vote, VoteStoreError};
use parking_lot::RwLock;
use rocksdb::{IteratorMode, Options, WriteBatch, DB};
use shared_types::{UserId, VoteHash, VoteType};

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory.
    pub path: String,
    /// Block cache size in bytes.
    pub block_cache_size: usize,
    /// Write buffer size in bytes.
    pub write_buffer_size: usize,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/hq/rocksdb".to_string(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (small buffers, no sync).
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed vote store.
pub struct RocksDbVoteStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

impl RocksDbVoteStore {
    /// Open or create the database.
    pub fn open(config: RocksDbConfig) -> Result<Self, VoteStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| {
            VoteStoreError::ReadFailed(format!("failed to open RocksDB at {}: {}", config.path, e))
        })?;

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    /// The shared database handle, for adapters living in other keyspaces.
    pub fn handle(&self) -> Arc<RwLock<DB>> {
        Arc::clone(&self.db)
    }

    fn write_options(&self) -> rocksdb::WriteOptions {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }

    fn vote_key(user_id: &UserId, vote_type: VoteType, hash: &VoteHash) -> Vec<u8> {
        format!("vote:{}:{}:{}", user_id, vote_type, hash).into_bytes()
    }

    fn type_prefix(user_id: &UserId, vote_type: VoteType) -> Vec<u8> {
        format!("vote:{}:{}:", user_id, vote_type).into_bytes()
    }

    fn encode(vote: &Vote) -> Result<Vec<u8>, VoteStoreError> {
        bincode::serialize(vote).map_err(|e| VoteStoreError::WriteFailed(e.to_string()))
    }
}

impl VoteStore for RocksDbVoteStore {
    fn votes_for(
        &self,
        user_id: &UserId,
        vote_type: VoteType,
    ) -> Result<Vec<Vote>, VoteStoreError> {
        let prefix = Self::type_prefix(user_id, vote_type);
        let db = self.db.read();
        let mut votes = Vec::new();

        let iter = db.iterator(IteratorMode::From(&prefix, rocksdb::Direction::Forward));
        for item in iter {
            let (key, value) = item.map_err(|e| VoteStoreError::ReadFailed(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            let vote: Vote = bincode::deserialize(&value)
                .map_err(|e| VoteStoreError::Corrupted(e.to_string()))?;
            votes.push(vote);
        }

        Ok(votes)
    }

    fn upsert_batch(&self, rows: &[Vote]) -> Result<(), VoteStoreError> {
        let mut batch = WriteBatch::default();
        for row in rows {
            let key = Self::vote_key(&row.user_id, row.vote_type, &row.hash);
            batch.put(&key, Self::encode(row)?);
        }

        let db = self.db.write();
        db.write_opt(batch, &self.write_options())
            .map_err(|e| VoteStoreError::WriteFailed(e.to_string()))
    }

    fn save(&self, vote: &Vote) -> Result<(), VoteStoreError> {
        let key = Self::vote_key(&vote.user_id, vote.vote_type, &vote.hash);
        let value = Self::encode(vote)?;

        let db = self.db.write();
        db.put_opt(&key, &value, &self.write_options())
            .map_err(|e| VoteStoreError::WriteFailed(e.to_string()))
    }
}
