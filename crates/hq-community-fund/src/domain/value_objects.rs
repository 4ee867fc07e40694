//! Value objects for community-fund configuration and synchronization reports.

use serde::{Deserialize, Serialize};
use shared_types::{SpendingAddress, UserId, VoteHash, VoteType};

/// Storage identity of a vote: one row per (user, vote type, hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteKey {
    pub user_id: UserId,
    pub vote_type: VoteType,
    pub hash: VoteHash,
}

impl VoteKey {
    pub fn new(user_id: UserId, vote_type: VoteType, hash: VoteHash) -> Self {
        Self {
            user_id,
            vote_type,
            hash,
        }
    }
}

/// Community-fund service configuration.
///
/// Passed explicitly to the service constructor; there is no process-wide
/// configuration singleton.
#[derive(Clone, Debug)]
pub struct CommunityFundConfig {
    /// Maximum intents accepted in a single update call
    pub max_intents_per_batch: usize,
}

impl Default for CommunityFundConfig {
    fn default() -> Self {
        Self {
            max_intents_per_batch: 100,
        }
    }
}

/// Result of a single pool submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// The pool acknowledged the vote.
    Accepted,
    /// The pool rejected the vote or the call failed.
    Rejected(String),
}

impl SubmissionStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionStatus::Accepted)
    }
}

/// Outcome of one (address, vote) submission pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Address the vote was cast from.
    pub address: SpendingAddress,
    /// Ballot the vote was cast for.
    pub hash: VoteHash,
    /// Accepted or rejected.
    pub status: SubmissionStatus,
}

/// Report returned by one synchronization pass.
///
/// `created` and `updated` count the rows the batch upsert wrote;
/// `outcomes` holds one entry per pool submission attempted afterwards.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Rows the batch inserted.
    pub created: usize,
    /// Rows the batch replaced.
    pub updated: usize,
    /// One entry per (address, vote) submission attempted.
    pub outcomes: Vec<SubmissionOutcome>,
}

impl SyncReport {
    /// True when every attempted submission was accepted.
    pub fn all_accepted(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_accepted())
    }

    /// The submissions the pool rejected.
    pub fn rejected(&self) -> Vec<&SubmissionOutcome> {
        self.outcomes
            .iter()
            .filter(|o| !o.status.is_accepted())
            .collect()
    }

    /// True when the pass had nothing to do.
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.outcomes.is_empty()
    }
}
