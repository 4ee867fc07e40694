//! # Community Fund Service
//!
//! The reconciliation engine behind [`CommunityFundApi`].
//!
//! ## Synchronization Pass
//!
//! One `update_*_votes` call runs:
//!
//! 1. Fetch the user's stored votes of that type (the baseline)
//! 2. Plan the write set: matched intents replace choices, unmatched
//!    intents become rows, everything `committed = false`
//! 3. Upsert the batch atomically
//! 4. Cast every planned vote through the pool, once per spending address
//! 5. Mark a vote committed only when every address accepted it
//!
//! ## Failure Semantics
//!
//! Baseline fetch, batch persist and address lookup failures abort the
//! pass. Individual pool rejections do not: they are logged, recorded in
//! the [`SyncReport`] and left for the next pass to retry, which works
//! because the affected votes keep `committed = false`.
//!
//! ## Thread Safety
//!
//! The service holds its ports behind `Arc` and keeps no mutable state of
//! its own, so it can be shared across async tasks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{
    check_batch_invariants, invariant_commit_requires_full_acceptance, plan_vote_batch,
    CommunityFundConfig, CommunityFundError, SubmissionOutcome, SubmissionStatus, SyncReport, Vote,
    VoteIntent,
};
use crate::ports::inbound::CommunityFundApi;
use crate::ports::outbound::{AddressResolver, VoteStore, VoteSubmitter};
use shared_types::{SpendingAddress, UserId, VoteType};

/// Community Fund Service.
///
/// Reconciles ballot batches against stored votes and propagates the
/// result to the pool (Subsystem: community fund).
///
/// ## Dependencies
///
/// Requires three port implementations:
/// - `S: VoteStore` - durable vote rows, atomic batch upsert
/// - `A: AddressResolver` - the user's registered spending addresses
/// - `P: VoteSubmitter` - the pool voting API
pub struct CommunityFundService<S, A, P>
where
    S: VoteStore,
    A: AddressResolver,
    P: VoteSubmitter,
{
    /// Service configuration.
    config: CommunityFundConfig,
    /// Durable vote storage.
    store: Arc<S>,
    /// User address book.
    addresses: Arc<A>,
    /// Pool voting API.
    pool: Arc<P>,
}

impl<S, A, P> CommunityFundService<S, A, P>
where
    S: VoteStore,
    A: AddressResolver,
    P: VoteSubmitter,
{
    pub fn new(config: CommunityFundConfig, store: Arc<S>, addresses: Arc<A>, pool: Arc<P>) -> Self {
        Self {
            config,
            store,
            addresses,
            pool,
        }
    }

    /// Shared path behind both update operations.
    async fn update_votes(
        &self,
        intents: Vec<VoteIntent>,
        user_id: &UserId,
        vote_type: VoteType,
    ) -> Result<SyncReport, CommunityFundError> {
        if intents.is_empty() {
            debug!(
                "[community-fund] Empty {} batch for user {}, nothing to do",
                vote_type, user_id
            );
            return Ok(SyncReport::default());
        }

        if intents.len() > self.config.max_intents_per_batch {
            return Err(CommunityFundError::BatchTooLarge {
                got: intents.len(),
                max: self.config.max_intents_per_batch,
            });
        }

        let baseline = self
            .store
            .votes_for(user_id, vote_type)
            .map_err(|source| CommunityFundError::VotesFetchFailed { vote_type, source })?;

        let plan = plan_vote_batch(&intents, &baseline, *user_id, vote_type);
        debug_assert!(check_batch_invariants(&plan.rows).is_ok());

        // All-or-nothing: a failure here leaves the store untouched
        self.store.upsert_batch(&plan.rows)?;

        info!(
            "[community-fund] {} {} votes updated for user {} ({} created, {} updated)",
            plan.rows.len(),
            vote_type,
            user_id,
            plan.created,
            plan.updated
        );

        let outcomes = self.propagate(&plan.rows, user_id).await?;

        Ok(SyncReport {
            created: plan.created,
            updated: plan.updated,
            outcomes,
        })
    }

    /// Cast freshly written votes through the pool, once per address.
    ///
    /// Only the address lookup can fail here. Submission failures are
    /// recorded per pair and never stop the remaining pairs.
    async fn propagate(
        &self,
        votes: &[Vote],
        user_id: &UserId,
    ) -> Result<Vec<SubmissionOutcome>, CommunityFundError> {
        let addresses = self
            .addresses
            .addresses_for(user_id)
            .await
            .map_err(|source| CommunityFundError::AddressLookupFailed {
                user_id: *user_id,
                source,
            })?;

        if addresses.is_empty() {
            warn!(
                "[community-fund] User {} has no spending addresses, votes stay uncommitted",
                user_id
            );
            return Ok(Vec::new());
        }

        let mut all_outcomes = Vec::with_capacity(votes.len() * addresses.len());

        for vote in votes {
            let outcomes = self.cast_vote(vote, &addresses).await;

            if invariant_commit_requires_full_acceptance(&outcomes, &addresses) {
                let mut committed = vote.clone();
                committed.committed = true;
                // A failed flag write only delays the commit; the next pass
                // re-casts the vote and tries again
                if let Err(e) = self.store.save(&committed) {
                    warn!(
                        "[community-fund] Failed to mark vote {} committed: {}",
                        vote.hash, e
                    );
                }
            }

            all_outcomes.extend(outcomes);
        }

        Ok(all_outcomes)
    }

    /// Submit one vote from every address, collecting per-pair outcomes.
    async fn cast_vote(
        &self,
        vote: &Vote,
        addresses: &[SpendingAddress],
    ) -> Vec<SubmissionOutcome> {
        let token = vote.choice.pool_token();
        let mut outcomes = Vec::with_capacity(addresses.len());

        for address in addresses {
            let result = match vote.vote_type {
                VoteType::Proposal => {
                    self.pool
                        .submit_proposal_vote(address, &vote.hash, token)
                        .await
                }
                VoteType::PaymentRequest => {
                    self.pool
                        .submit_payment_request_vote(address, &vote.hash, token)
                        .await
                }
            };

            let status = match result {
                Ok(()) => SubmissionStatus::Accepted,
                Err(e) => {
                    warn!(
                        "[community-fund] Pool rejected {} vote {} from {}: {}",
                        vote.vote_type, vote.hash, address, e
                    );
                    SubmissionStatus::Rejected(e.to_string())
                }
            };

            outcomes.push(SubmissionOutcome {
                address: address.clone(),
                hash: vote.hash.clone(),
                status,
            });
        }

        outcomes
    }
}

#[async_trait]
impl<S, A, P> CommunityFundApi for CommunityFundService<S, A, P>
where
    S: VoteStore + 'static,
    A: AddressResolver + 'static,
    P: VoteSubmitter + 'static,
{
    async fn proposal_votes(&self, user_id: &UserId) -> Result<Vec<Vote>, CommunityFundError> {
        self.store
            .votes_for(user_id, VoteType::Proposal)
            .map_err(|source| CommunityFundError::VotesFetchFailed {
                vote_type: VoteType::Proposal,
                source,
            })
    }

    async fn payment_request_votes(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Vote>, CommunityFundError> {
        self.store
            .votes_for(user_id, VoteType::PaymentRequest)
            .map_err(|source| CommunityFundError::VotesFetchFailed {
                vote_type: VoteType::PaymentRequest,
                source,
            })
    }

    async fn update_proposal_votes(
        &self,
        intents: Vec<VoteIntent>,
        user_id: &UserId,
    ) -> Result<SyncReport, CommunityFundError> {
        self.update_votes(intents, user_id, VoteType::Proposal).await
    }

    async fn update_payment_request_votes(
        &self,
        intents: Vec<VoteIntent>,
        user_id: &UserId,
    ) -> Result<SyncReport, CommunityFundError> {
        self.update_votes(intents, user_id, VoteType::PaymentRequest)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VoteKey;
    use crate::ports::outbound::{MockAddressResolver, MockVoteStore, MockVoteSubmitter};
    use shared_types::{VoteChoice, VoteHash};

    type TestService = CommunityFundService<MockVoteStore, MockAddressResolver, MockVoteSubmitter>;

    fn two_addresses() -> Vec<SpendingAddress> {
        vec![
            SpendingAddress::from("NAddr1"),
            SpendingAddress::from("NAddr2"),
        ]
    }

    fn create_test_service(
        addresses: Vec<SpendingAddress>,
    ) -> (TestService, Arc<MockVoteStore>, Arc<MockVoteSubmitter>) {
        let store = Arc::new(MockVoteStore::new());
        let resolver = Arc::new(MockAddressResolver::with_addresses(addresses));
        let pool = Arc::new(MockVoteSubmitter::new());
        let service = CommunityFundService::new(
            CommunityFundConfig::default(),
            Arc::clone(&store),
            resolver,
            Arc::clone(&pool),
        );
        (service, store, pool)
    }

    fn proposal_key(user: UserId, hash: &str) -> VoteKey {
        VoteKey::new(user, VoteType::Proposal, VoteHash::from(hash))
    }

    #[tokio::test]
    async fn test_fresh_vote_commits_when_pool_accepts() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        let report = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await
            .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 0);
        assert_eq!(report.outcomes.len(), 2);
        assert!(report.all_accepted());

        let stored = store.get(&proposal_key(user, "prop-1")).unwrap();
        assert!(stored.committed);

        let calls = pool.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.vote_type == VoteType::Proposal));
        assert!(calls.iter().all(|c| c.choice_token == "yes"));
    }

    #[tokio::test]
    async fn test_failing_pool_keeps_vote_stored_but_uncommitted() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        pool.set_should_fail(true);

        let report = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await
            .unwrap();

        // Pool trouble is not an error of the pass
        assert_eq!(report.created, 1);
        assert_eq!(report.rejected().len(), 2);

        let stored = store.get(&proposal_key(user, "prop-1")).unwrap();
        assert!(!stored.committed);
    }

    #[tokio::test]
    async fn test_one_rejected_address_blocks_the_commit() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        pool.reject_address(SpendingAddress::from("NAddr2"));

        let report = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.rejected().len(), 1);
        assert_eq!(
            report.rejected()[0].address,
            SpendingAddress::from("NAddr2")
        );

        // One address accepted is not enough
        let stored = store.get(&proposal_key(user, "prop-1")).unwrap();
        assert!(!stored.committed);
    }

    #[tokio::test]
    async fn test_votes_commit_independently() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        pool.reject_hash(VoteHash::from("prop-2"));

        let report = service
            .update_proposal_votes(
                vec![
                    VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes),
                    VoteIntent::new(VoteHash::from("prop-2"), VoteChoice::No),
                ],
                &user,
            )
            .await
            .unwrap();

        // Two votes times two addresses
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.rejected().len(), 2);

        assert!(store.get(&proposal_key(user, "prop-1")).unwrap().committed);
        assert!(!store.get(&proposal_key(user, "prop-2")).unwrap().committed);

        // All pairs of one vote are cast before the next vote starts
        let calls = pool.calls();
        assert_eq!(calls[0].hash, VoteHash::from("prop-1"));
        assert_eq!(calls[1].hash, VoteHash::from("prop-1"));
        assert_eq!(calls[2].hash, VoteHash::from("prop-2"));
        assert_eq!(calls[3].hash, VoteHash::from("prop-2"));
    }

    #[tokio::test]
    async fn test_update_replaces_choice_and_recommits() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        let mut existing = Vote::new(
            user,
            VoteType::Proposal,
            VoteHash::from("prop-1"),
            VoteChoice::Yes,
        );
        existing.committed = true;
        store.save(&existing).unwrap();

        let report = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::No)],
                &user,
            )
            .await
            .unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 1);

        let stored = store.get(&proposal_key(user, "prop-1")).unwrap();
        assert_eq!(stored.choice, VoteChoice::No);
        assert!(stored.committed);
        assert!(pool.calls().iter().all(|c| c.choice_token == "no"));
    }

    #[tokio::test]
    async fn test_resubmitting_identical_choice_recasts_the_vote() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        let mut existing = Vote::new(
            user,
            VoteType::Proposal,
            VoteHash::from("prop-1"),
            VoteChoice::Yes,
        );
        existing.committed = true;
        store.save(&existing).unwrap();

        let report = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await
            .unwrap();

        // Same choice still counts as an update and goes back to the pool
        assert_eq!(report.updated, 1);
        assert_eq!(pool.call_count(), 2);
        assert!(store.get(&proposal_key(user, "prop-1")).unwrap().committed);
    }

    #[tokio::test]
    async fn test_uncommitted_vote_converges_once_pool_recovers() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();
        let intent = VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes);

        pool.set_should_fail(true);
        service
            .update_proposal_votes(vec![intent.clone()], &user)
            .await
            .unwrap();
        assert!(!store.get(&proposal_key(user, "prop-1")).unwrap().committed);

        pool.clear_rejections();
        let report = service
            .update_proposal_votes(vec![intent], &user)
            .await
            .unwrap();

        assert!(report.all_accepted());
        assert!(store.get(&proposal_key(user, "prop-1")).unwrap().committed);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        let report = service.update_proposal_votes(Vec::new(), &user).await.unwrap();

        assert!(report.is_empty());
        assert!(store.is_empty());
        assert_eq!(pool.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_before_any_write() {
        let store = Arc::new(MockVoteStore::new());
        let pool = Arc::new(MockVoteSubmitter::new());
        let service = CommunityFundService::new(
            CommunityFundConfig {
                max_intents_per_batch: 2,
            },
            Arc::clone(&store),
            Arc::new(MockAddressResolver::with_addresses(two_addresses())),
            Arc::clone(&pool),
        );
        let user = UserId::new();

        let intents = vec![
            VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes),
            VoteIntent::new(VoteHash::from("prop-2"), VoteChoice::Yes),
            VoteIntent::new(VoteHash::from("prop-3"), VoteChoice::Yes),
        ];
        let result = service.update_proposal_votes(intents, &user).await;

        assert!(matches!(
            result,
            Err(CommunityFundError::BatchTooLarge { got: 3, max: 2 })
        ));
        assert!(store.is_empty());
        assert_eq!(pool.call_count(), 0);
    }

    #[tokio::test]
    async fn test_baseline_fetch_failure_is_terminal() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        store.set_fail_reads(true);

        let result = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await;

        assert!(matches!(
            result,
            Err(CommunityFundError::VotesFetchFailed {
                vote_type: VoteType::Proposal,
                ..
            })
        ));
        assert_eq!(pool.call_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_persist_failure_is_terminal() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        store.set_fail_writes(true);

        let result = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await;

        assert!(matches!(result, Err(CommunityFundError::BatchPersistFailed(_))));
        assert!(store.is_empty());
        assert_eq!(pool.call_count(), 0);
    }

    #[tokio::test]
    async fn test_address_lookup_failure_leaves_batch_durable() {
        let store = Arc::new(MockVoteStore::new());
        let resolver = Arc::new(MockAddressResolver::with_addresses(two_addresses()));
        let pool = Arc::new(MockVoteSubmitter::new());
        let service = CommunityFundService::new(
            CommunityFundConfig::default(),
            Arc::clone(&store),
            Arc::clone(&resolver),
            Arc::clone(&pool),
        );
        let user = UserId::new();

        resolver.set_should_fail(true);

        let result = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await;

        assert!(matches!(
            result,
            Err(CommunityFundError::AddressLookupFailed { .. })
        ));

        // The batch survived; only propagation was cut short
        let stored = store.get(&proposal_key(user, "prop-1")).unwrap();
        assert!(!stored.committed);
        assert_eq!(pool.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_addresses_means_no_submissions_and_no_commit() {
        let (service, store, pool) = create_test_service(Vec::new());
        let user = UserId::new();

        let report = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await
            .unwrap();

        assert_eq!(report.created, 1);
        assert!(report.outcomes.is_empty());
        assert_eq!(pool.call_count(), 0);
        assert!(!store.get(&proposal_key(user, "prop-1")).unwrap().committed);
    }

    #[tokio::test]
    async fn test_commit_flag_save_failure_is_not_fatal() {
        let (service, store, _pool) = create_test_service(two_addresses());
        let user = UserId::new();

        store.set_fail_saves(true);

        let report = service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Yes)],
                &user,
            )
            .await
            .unwrap();

        // The pool accepted everywhere, only the flag write was lost
        assert!(report.all_accepted());
        let stored = store.get(&proposal_key(user, "prop-1")).unwrap();
        assert!(!stored.committed);
    }

    #[tokio::test]
    async fn test_abstain_casts_the_remove_token() {
        let (service, _store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        service
            .update_proposal_votes(
                vec![VoteIntent::new(VoteHash::from("prop-1"), VoteChoice::Abstain)],
                &user,
            )
            .await
            .unwrap();

        assert!(pool.calls().iter().all(|c| c.choice_token == "remove"));
    }

    #[tokio::test]
    async fn test_payment_requests_use_their_own_endpoint() {
        let (service, store, pool) = create_test_service(two_addresses());
        let user = UserId::new();

        service
            .update_payment_request_votes(
                vec![VoteIntent::new(VoteHash::from("pay-1"), VoteChoice::Yes)],
                &user,
            )
            .await
            .unwrap();

        assert!(pool
            .calls()
            .iter()
            .all(|c| c.vote_type == VoteType::PaymentRequest));

        let key = VoteKey::new(user, VoteType::PaymentRequest, VoteHash::from("pay-1"));
        assert!(store.get(&key).unwrap().committed);
    }

    #[tokio::test]
    async fn test_read_operations_filter_by_type() {
        let (service, store, _pool) = create_test_service(two_addresses());
        let user = UserId::new();

        store
            .upsert_batch(&[
                Vote::new(
                    user,
                    VoteType::Proposal,
                    VoteHash::from("prop-1"),
                    VoteChoice::Yes,
                ),
                Vote::new(
                    user,
                    VoteType::PaymentRequest,
                    VoteHash::from("pay-1"),
                    VoteChoice::No,
                ),
            ])
            .unwrap();

        let proposals = service.proposal_votes(&user).await.unwrap();
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].vote_type, VoteType::Proposal);

        let payments = service.payment_request_votes(&user).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].hash, VoteHash::from("pay-1"));
    }
}
