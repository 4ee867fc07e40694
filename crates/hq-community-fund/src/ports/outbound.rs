//! Outbound ports for the community-fund subsystem.
//!
//! Traits for the collaborators the service drives: durable vote storage,
//! the user address book, and the pool voting API. Adapters live in
//! `adapters/` and in the runtime crate.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{SpendingAddress, UserId, VoteHash, VoteType};

use crate::domain::{AddressLookupError, SubmitError, Vote, VoteKey, VoteStoreError};

/// Durable vote storage - outbound port.
///
/// Rows are keyed by (user, vote type, hash); writing a row with an
/// existing key replaces it.
pub trait VoteStore: Send + Sync {
    /// All votes of one type stored for a user.
    fn votes_for(&self, user_id: &UserId, vote_type: VoteType)
        -> Result<Vec<Vote>, VoteStoreError>;

    /// Write a batch of rows atomically.
    ///
    /// Either every row lands or none does; concurrent callers writing the
    /// same keys interleave per key instead of producing duplicates.
    fn upsert_batch(&self, rows: &[Vote]) -> Result<(), VoteStoreError>;

    /// Write a single row, replacing any stored version.
    fn save(&self, vote: &Vote) -> Result<(), VoteStoreError>;
}

/// User address book - outbound port.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Every spending address registered for the user.
    ///
    /// An empty list is a valid answer: the user simply has no address to
    /// vote from yet.
    async fn addresses_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SpendingAddress>, AddressLookupError>;
}

/// Pool voting API - outbound port.
///
/// `choice_token` is the pool protocol token ("yes", "no" or "remove"),
/// produced by `VoteChoice::pool_token`. Implementations are expected to
/// bound every call with a timeout so a stalled pool surfaces as an
/// ordinary `SubmitError`.
#[async_trait]
pub trait VoteSubmitter: Send + Sync {
    /// Cast a proposal vote from one spending address.
    async fn submit_proposal_vote(
        &self,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError>;

    /// Cast a payment-request vote from one spending address.
    async fn submit_payment_request_vote(
        &self,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock vote store for testing.
///
/// Backed by a plain map with switchable read/write failure injection.
#[derive(Default)]
pub struct MockVoteStore {
    rows: RwLock<HashMap<VoteKey, Vote>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_saves: AtomicBool,
}

impl MockVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail until cleared.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make batch writes fail until cleared.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make single-row saves fail until cleared.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Fetch one stored row.
    pub fn get(&self, key: &VoteKey) -> Option<Vote> {
        self.rows.read().get(key).cloned()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl VoteStore for MockVoteStore {
    fn votes_for(
        &self,
        user_id: &UserId,
        vote_type: VoteType,
    ) -> Result<Vec<Vote>, VoteStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(VoteStoreError::ReadFailed("mock read failure".to_string()));
        }

        let mut votes: Vec<Vote> = self
            .rows
            .read()
            .values()
            .filter(|v| v.user_id == *user_id && v.vote_type == vote_type)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.hash.0.cmp(&b.hash.0));
        Ok(votes)
    }

    fn upsert_batch(&self, rows: &[Vote]) -> Result<(), VoteStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            // Failure happens before anything is applied
            return Err(VoteStoreError::WriteFailed("mock write failure".to_string()));
        }

        let mut map = self.rows.write();
        for row in rows {
            map.insert(row.key(), row.clone());
        }
        Ok(())
    }

    fn save(&self, vote: &Vote) -> Result<(), VoteStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(VoteStoreError::WriteFailed("mock save failure".to_string()));
        }

        self.rows.write().insert(vote.key(), vote.clone());
        Ok(())
    }
}

/// Mock address book for testing.
#[derive(Default)]
pub struct MockAddressResolver {
    addresses: RwLock<Vec<SpendingAddress>>,
    should_fail: AtomicBool,
}

impl MockAddressResolver {
    pub fn with_addresses(addresses: Vec<SpendingAddress>) -> Self {
        Self {
            addresses: RwLock::new(addresses),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_addresses(&self, addresses: Vec<SpendingAddress>) {
        *self.addresses.write() = addresses;
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AddressResolver for MockAddressResolver {
    async fn addresses_for(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<SpendingAddress>, AddressLookupError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AddressLookupError::ReadFailed(
                "mock lookup failure".to_string(),
            ));
        }
        Ok(self.addresses.read().clone())
    }
}

/// A single call recorded by [`MockVoteSubmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub vote_type: VoteType,
    pub address: SpendingAddress,
    pub hash: VoteHash,
    pub choice_token: String,
}

/// Mock pool submitter for testing.
///
/// Records every call and supports failure injection globally, per
/// address, or per ballot hash.
#[derive(Default)]
pub struct MockVoteSubmitter {
    calls: RwLock<Vec<RecordedSubmission>>,
    rejected_addresses: RwLock<HashSet<SpendingAddress>>,
    rejected_hashes: RwLock<HashSet<VoteHash>>,
    should_fail: AtomicBool,
}

impl MockVoteSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every submission until cleared.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Reject submissions from one address.
    pub fn reject_address(&self, address: SpendingAddress) {
        self.rejected_addresses.write().insert(address);
    }

    /// Reject submissions for one ballot.
    pub fn reject_hash(&self, hash: VoteHash) {
        self.rejected_hashes.write().insert(hash);
    }

    /// Drop all configured rejections.
    pub fn clear_rejections(&self) {
        self.rejected_addresses.write().clear();
        self.rejected_hashes.write().clear();
        self.should_fail.store(false, Ordering::SeqCst);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedSubmission> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    fn submit(
        &self,
        vote_type: VoteType,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError> {
        self.calls.write().push(RecordedSubmission {
            vote_type,
            address: address.clone(),
            hash: hash.clone(),
            choice_token: choice_token.to_string(),
        });

        if self.should_fail.load(Ordering::SeqCst)
            || self.rejected_addresses.read().contains(address)
            || self.rejected_hashes.read().contains(hash)
        {
            return Err(SubmitError::Rejected { status: 503 });
        }

        Ok(())
    }
}

#[async_trait]
impl VoteSubmitter for MockVoteSubmitter {
    async fn submit_proposal_vote(
        &self,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError> {
        self.submit(VoteType::Proposal, address, hash, choice_token)
    }

    async fn submit_payment_request_vote(
        &self,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError> {
        self.submit(VoteType::PaymentRequest, address, hash, choice_token)
    }
}
