//! Write-path invariants for vote synchronization.

use std::collections::HashSet;

use shared_types::SpendingAddress;

use super::{SubmissionOutcome, Vote};

/// Deduplication: a planned batch carries at most one row per ballot.
pub fn invariant_unique_vote_keys(rows: &[Vote]) -> bool {
    let mut seen = HashSet::new();
    rows.iter().all(|vote| seen.insert(vote.key()))
}

/// Pending-by-default: every row entering the store from a batch is
/// uncommitted until a propagation pass proves otherwise.
pub fn invariant_rows_uncommitted(rows: &[Vote]) -> bool {
    rows.iter().all(|vote| !vote.committed)
}

/// Full acceptance: a vote may only be committed when at least one address
/// was attempted and every attempt was accepted.
pub fn invariant_commit_requires_full_acceptance(
    outcomes: &[SubmissionOutcome],
    addresses: &[SpendingAddress],
) -> bool {
    !addresses.is_empty()
        && outcomes.len() == addresses.len()
        && outcomes.iter().all(|o| o.status.is_accepted())
}

/// Batch-plan violations surfaced by [`check_batch_invariants`].
#[derive(Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    DuplicateBallot,
    PrecommittedRow,
}

/// Check all write-path invariants for a planned batch.
pub fn check_batch_invariants(rows: &[Vote]) -> Result<(), InvariantViolation> {
    if !invariant_unique_vote_keys(rows) {
        return Err(InvariantViolation::DuplicateBallot);
    }

    if !invariant_rows_uncommitted(rows) {
        return Err(InvariantViolation::PrecommittedRow);
    }

    Ok(())
}
