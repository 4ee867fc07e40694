//! # Community-Fund Vote Synchronization Subsystem
//!
//! Reconciles user ballot submissions against stored votes and casts the
//! result through the staking pool, once per spending address.
//!
//! ## Architecture Role
//!
//! ```text
//! [account layer] ──VoteIntents──→ [Community Fund Service]
//!                                          │
//!                        ┌─────────────────┼──────────────────┐
//!                        ↓                 ↓                  ↓
//!                   [VoteStore]    [AddressResolver]   [VoteSubmitter]
//!                    (RocksDB)      (address book)       (pool API)
//! ```
//!
//! ## Commit Lifecycle
//!
//! - Batch upserts always land with `committed = false`
//! - A vote turns `committed = true` only after every spending address
//!   accepted it
//! - Uncommitted votes are re-cast by the next synchronization pass, so a
//!   pool outage delays propagation instead of losing ballots

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::CommunityFundApi;
pub use service::CommunityFundService;
