//! Inbound ports (API) for the community-fund subsystem.

use async_trait::async_trait;
use shared_types::UserId;

use crate::domain::{CommunityFundError, SyncReport, Vote, VoteIntent};

/// Primary API for community-fund vote synchronization.
///
/// One synchronization pass persists the submitted ballots atomically and
/// then casts each one through the pool, once per spending address the
/// user controls.
#[async_trait]
pub trait CommunityFundApi: Send + Sync {
    /// All stored proposal votes for a user.
    async fn proposal_votes(&self, user_id: &UserId) -> Result<Vec<Vote>, CommunityFundError>;

    /// All stored payment-request votes for a user.
    async fn payment_request_votes(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Vote>, CommunityFundError>;

    /// Reconcile a batch of proposal ballots and cast them through the pool.
    ///
    /// The batch lands with `committed = false` before any pool traffic.
    /// Per-address rejections are reported in the [`SyncReport`], not
    /// raised as errors; the affected votes simply stay uncommitted.
    async fn update_proposal_votes(
        &self,
        intents: Vec<VoteIntent>,
        user_id: &UserId,
    ) -> Result<SyncReport, CommunityFundError>;

    /// Reconcile a batch of payment-request ballots and cast them through
    /// the pool. Same contract as [`update_proposal_votes`].
    ///
    /// [`update_proposal_votes`]: CommunityFundApi::update_proposal_votes
    async fn update_payment_request_votes(
        &self,
        intents: Vec<VoteIntent>,
        user_id: &UserId,
    ) -> Result<SyncReport, CommunityFundError>;
}
