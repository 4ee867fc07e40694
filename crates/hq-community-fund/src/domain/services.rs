//! Domain services for vote reconciliation.

use shared_types::{UserId, VoteHash, VoteType};

use super::{Vote, VoteIntent};

/// Find the stored vote an intent refers to.
///
/// Linear scan, first exact (hash, type) match wins. `None` means the
/// intent creates a new row rather than replacing one.
pub fn matched_vote<'a>(
    hash: &VoteHash,
    vote_type: VoteType,
    existing: &'a [Vote],
) -> Option<&'a Vote> {
    existing
        .iter()
        .find(|vote| vote.vote_type == vote_type && &vote.hash == hash)
}

/// The write set one update batch produces against a stored baseline.
#[derive(Debug, Default)]
pub struct BatchPlan {
    /// Rows to upsert, every one with `committed = false`.
    pub rows: Vec<Vote>,
    /// Rows that did not exist before.
    pub created: usize,
    /// Rows replacing an existing vote.
    pub updated: usize,
}

/// Plan the write set for one update batch.
///
/// Matched intents replace the stored choice, unmatched intents become new
/// rows; both come out with `committed = false` so the propagation pass
/// re-casts them. Duplicate hashes within one batch collapse to the last
/// intent, matching the keyed upsert the store performs.
pub fn plan_vote_batch(
    intents: &[VoteIntent],
    baseline: &[Vote],
    user_id: UserId,
    vote_type: VoteType,
) -> BatchPlan {
    let mut plan = BatchPlan::default();

    for intent in intents {
        let matched = matched_vote(&intent.hash, vote_type, baseline);
        let row = match matched {
            Some(existing) => {
                let mut replacement = existing.clone();
                replacement.choice = intent.choice;
                replacement.committed = false;
                replacement
            }
            None => Vote::new(user_id, vote_type, intent.hash.clone(), intent.choice),
        };

        if let Some(i) = plan.rows.iter().position(|r| r.hash == row.hash) {
            // Same ballot twice in one batch: the later intent wins.
            plan.rows[i] = row;
        } else {
            if matched.is_some() {
                plan.updated += 1;
            } else {
                plan.created += 1;
            }
            plan.rows.push(row);
        }
    }

    plan
}
