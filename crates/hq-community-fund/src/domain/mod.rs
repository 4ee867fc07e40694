//! # Domain Layer for Community-Fund Voting
//!
//! Pure business logic with no I/O dependencies. This is the innermost layer
//! of the hexagonal architecture.
//!
//! ## Contents
//!
//! - **entities**: Core domain entities (`Vote`, `VoteIntent`)
//! - **value_objects**: Configuration and results (`CommunityFundConfig`, `SyncReport`)
//! - **services**: Domain operations (`matched_vote`, `plan_vote_batch`)
//! - **invariants**: Write-path invariant checks (deduplication, commit rules)
//! - **errors**: Error taxonomy for the subsystem and its ports
//!
//! ## Design Principles
//!
//! 1. **No I/O**: All functions are pure and synchronous
//! 2. **No External Dependencies**: Only depends on shared-types
//! 3. **Testable**: All logic can be unit tested without mocks

mod entities;
mod errors;
mod invariants;
mod services;
mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
