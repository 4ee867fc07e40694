//! # Shared Types Crate
//!
//! This crate contains the vocabulary types shared across the Pool HQ
//! subsystems: identifiers for users, votes and spending addresses, the
//! vote classification enums, and the mapping from ballot choices to the
//! tokens the pool protocol understands.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Newtypes over primitives**: Identifiers are distinct types so a user
//!   id can never be passed where a vote hash is expected.

pub mod entities;

pub use entities::*;
