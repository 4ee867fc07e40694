//! # Production Adapters
//!
//! RocksDB-backed implementations of the community-fund outbound ports:
//! the vote store and the stored address book. Both share one database,
//! isolated by key prefix.

pub mod addresses;
pub mod storage;
