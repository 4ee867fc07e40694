//! In-memory vote store adapter.
//!
//! Backs unit tests and embedded use; the production runtime wires the
//! RocksDB adapter instead.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{UserId, VoteType};

use crate::domain::{Vote, VoteKey, VoteStoreError};
use crate::ports::outbound::VoteStore;

/// Vote store backed by a process-local map.
#[derive(Default)]
pub struct InMemoryVoteStore {
    rows: RwLock<HashMap<VoteKey, Vote>>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl VoteStore for InMemoryVoteStore {
    fn votes_for(
        &self,
        user_id: &UserId,
        vote_type: VoteType,
    ) -> Result<Vec<Vote>, VoteStoreError> {
        let mut votes: Vec<Vote> = self
            .rows
            .read()
            .values()
            .filter(|v| v.user_id == *user_id && v.vote_type == vote_type)
            .cloned()
            .collect();
        // Sorted by hash for deterministic reads, matching the keyed backend
        votes.sort_by(|a, b| a.hash.0.cmp(&b.hash.0));
        Ok(votes)
    }

    fn upsert_batch(&self, rows: &[Vote]) -> Result<(), VoteStoreError> {
        // One write lock spans the whole batch, so readers never observe a
        // partial write
        let mut map = self.rows.write();
        for row in rows {
            map.insert(row.key(), row.clone());
        }
        Ok(())
    }

    fn save(&self, vote: &Vote) -> Result<(), VoteStoreError> {
        self.rows.write().insert(vote.key(), vote.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{VoteChoice, VoteHash};

    #[test]
    fn test_upsert_creates_then_replaces() {
        let store = InMemoryVoteStore::new();
        let user = UserId::new();

        let first = Vote::new(
            user,
            VoteType::Proposal,
            VoteHash::from("prop-1"),
            VoteChoice::Yes,
        );
        store.upsert_batch(std::slice::from_ref(&first)).unwrap();
        assert_eq!(store.len(), 1);

        let mut second = first.clone();
        second.choice = VoteChoice::No;
        store.upsert_batch(std::slice::from_ref(&second)).unwrap();

        // Same key, so still one row, with the new choice
        let votes = store.votes_for(&user, VoteType::Proposal).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(votes[0].choice, VoteChoice::No);
    }

    #[test]
    fn test_votes_for_filters_by_user_and_type() {
        let store = InMemoryVoteStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        store
            .upsert_batch(&[
                Vote::new(
                    alice,
                    VoteType::Proposal,
                    VoteHash::from("prop-1"),
                    VoteChoice::Yes,
                ),
                Vote::new(
                    alice,
                    VoteType::PaymentRequest,
                    VoteHash::from("pay-1"),
                    VoteChoice::No,
                ),
                Vote::new(
                    bob,
                    VoteType::Proposal,
                    VoteHash::from("prop-2"),
                    VoteChoice::Abstain,
                ),
            ])
            .unwrap();

        let alice_proposals = store.votes_for(&alice, VoteType::Proposal).unwrap();
        assert_eq!(alice_proposals.len(), 1);
        assert_eq!(alice_proposals[0].hash, VoteHash::from("prop-1"));

        let bob_payments = store.votes_for(&bob, VoteType::PaymentRequest).unwrap();
        assert!(bob_payments.is_empty());
    }

    #[test]
    fn test_votes_for_sorted_by_hash() {
        let store = InMemoryVoteStore::new();
        let user = UserId::new();

        store
            .upsert_batch(&[
                Vote::new(
                    user,
                    VoteType::Proposal,
                    VoteHash::from("prop-b"),
                    VoteChoice::Yes,
                ),
                Vote::new(
                    user,
                    VoteType::Proposal,
                    VoteHash::from("prop-a"),
                    VoteChoice::Yes,
                ),
            ])
            .unwrap();

        let votes = store.votes_for(&user, VoteType::Proposal).unwrap();
        assert_eq!(votes[0].hash, VoteHash::from("prop-a"));
        assert_eq!(votes[1].hash, VoteHash::from("prop-b"));
    }

    #[test]
    fn test_save_flips_commit_flag() {
        let store = InMemoryVoteStore::new();
        let user = UserId::new();

        let mut vote = Vote::new(
            user,
            VoteType::Proposal,
            VoteHash::from("prop-1"),
            VoteChoice::Yes,
        );
        store.upsert_batch(std::slice::from_ref(&vote)).unwrap();

        vote.committed = true;
        store.save(&vote).unwrap();

        let votes = store.votes_for(&user, VoteType::Proposal).unwrap();
        assert!(votes[0].committed);
    }
}
