//! # Core Vocabulary Types
//!
//! Defines the identifiers and classification enums shared by every Pool HQ
//! subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`, `VoteHash`, `SpendingAddress`
//! - **Classification**: `VoteType`, `VoteChoice`

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Unique identifier for a pool user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a fresh random user id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The chain-level identifier of a proposal or payment request.
///
/// Opaque to HQ; it is produced by the consensus layer and only ever
/// compared for equality and forwarded to the pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteHash(pub String);

impl VoteHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VoteHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for VoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A blockchain address a user has staked through the pool.
///
/// Votes are cast once per address, so one ballot fans out to every
/// address the user controls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpendingAddress(pub String);

impl SpendingAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpendingAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SpendingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER B: VOTE CLASSIFICATION
// =============================================================================

/// The two kinds of community-fund ballots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    /// A community-fund proposal asking for budget.
    Proposal,
    /// A payment request drawing on an accepted proposal.
    PaymentRequest,
}

impl VoteType {
    /// Stable storage/wire tag for this vote type.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Proposal => "PROPOSAL",
            VoteType::PaymentRequest => "PAYMENT_REQUEST",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's stance on a single ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteChoice {
    Yes,
    No,
    Abstain,
}

impl VoteChoice {
    /// Stable storage/wire tag for this choice.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Yes => "YES",
            VoteChoice::No => "NO",
            VoteChoice::Abstain => "ABSTAIN",
        }
    }

    /// The token the pool protocol expects for this choice.
    ///
    /// Abstaining is expressed by removing any standing vote, hence
    /// `"remove"` rather than a third ballot value.
    pub fn pool_token(&self) -> &'static str {
        match self {
            VoteChoice::Yes => "yes",
            VoteChoice::No => "no",
            VoteChoice::Abstain => "remove",
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_token_mapping() {
        assert_eq!(VoteChoice::Yes.pool_token(), "yes");
        assert_eq!(VoteChoice::No.pool_token(), "no");
        assert_eq!(VoteChoice::Abstain.pool_token(), "remove");
    }

    #[test]
    fn test_vote_type_tags() {
        assert_eq!(VoteType::Proposal.as_str(), "PROPOSAL");
        assert_eq!(VoteType::PaymentRequest.as_str(), "PAYMENT_REQUEST");
    }

    #[test]
    fn test_vote_type_serializes_to_wire_tag() {
        let json = serde_json::to_string(&VoteType::PaymentRequest).unwrap();
        assert_eq!(json, "\"PAYMENT_REQUEST\"");
    }

    #[test]
    fn test_user_ids_are_unique() {
        assert_ne!(UserId::new(), UserId::new());
    }
}
