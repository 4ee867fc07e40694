//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports that ship with the
//! subsystem: an in-memory vote store for tests and embedded use, and the
//! reqwest-backed pool API client. The production RocksDB store lives in
//! the runtime crate.

pub mod memory;
#[cfg(feature = "pool-client")]
pub mod pool_api;

pub use memory::InMemoryVoteStore;
#[cfg(feature = "pool-client")]
pub use pool_api::{PoolApiClient, PoolApiConfig, PoolStats};
