//! # HQ Runtime Library
//!
//! This library exposes the internal modules of the HQ runtime for
//! integration testing. The main entry point is the `hq-runtime` binary.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: the community-fund subsystem defines ports,
//!   this crate provides the production adapters
//! - **Explicit wiring**: all dependencies are assembled once in
//!   [`container::ServiceContainer`], nothing reads global state

pub mod adapters;
pub mod container;

pub use adapters::addresses::StoredAddressResolver;
pub use adapters::storage::{RocksDbConfig, RocksDbVoteStore};
pub use container::{ConfigError, HqConfig, ServiceContainer, StorageConfig};
