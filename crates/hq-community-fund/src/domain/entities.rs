//! Core domain entities for community-fund voting.

use serde::{Deserialize, Serialize};
use shared_types::{UserId, VoteChoice, VoteHash, VoteType};

use super::VoteKey;

/// A stored community-fund vote.
///
/// One row per (user, vote type, hash). The `committed` flag tracks whether
/// the pool has accepted this vote from every spending address the user
/// controls; every local write clears it, and only a fully successful
/// propagation pass sets it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Owner of the ballot.
    pub user_id: UserId,
    /// Proposal or payment request.
    pub vote_type: VoteType,
    /// Chain-level identifier of the ballot subject.
    pub hash: VoteHash,
    /// The user's current stance.
    pub choice: VoteChoice,
    /// Whether the pool has acknowledged this vote from every address.
    pub committed: bool,
}

impl Vote {
    /// Create a fresh, not-yet-propagated vote.
    pub fn new(user_id: UserId, vote_type: VoteType, hash: VoteHash, choice: VoteChoice) -> Self {
        Self {
            user_id,
            vote_type,
            hash,
            choice,
            committed: false,
        }
    }

    /// The storage identity of this vote.
    pub fn key(&self) -> VoteKey {
        VoteKey::new(self.user_id, self.vote_type, self.hash.clone())
    }
}

/// A caller-submitted desired vote state.
///
/// Intents carry no user or vote type; both come from the call that
/// submits the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteIntent {
    /// Ballot subject the user is voting on.
    pub hash: VoteHash,
    /// Desired stance.
    pub choice: VoteChoice,
}

impl VoteIntent {
    pub fn new(hash: VoteHash, choice: VoteChoice) -> Self {
        Self { hash, choice }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vote_starts_uncommitted() {
        let vote = Vote::new(
            UserId::new(),
            VoteType::Proposal,
            VoteHash::from("abc123"),
            VoteChoice::Yes,
        );
        assert!(!vote.committed);
        assert_eq!(vote.choice, VoteChoice::Yes);
    }

    #[test]
    fn test_vote_key_identity() {
        let user = UserId::new();
        let a = Vote::new(
            user,
            VoteType::Proposal,
            VoteHash::from("abc123"),
            VoteChoice::Yes,
        );
        let mut b = a.clone();
        b.choice = VoteChoice::No;
        b.committed = true;

        // Choice and commit flag do not affect storage identity
        assert_eq!(a.key(), b.key());

        let other_type = Vote::new(
            user,
            VoteType::PaymentRequest,
            VoteHash::from("abc123"),
            VoteChoice::Yes,
        );
        assert_ne!(a.key(), other_type.key());
    }
}
