//! Error taxonomy for community-fund vote synchronization.
//!
//! Terminal failures abort the pass and surface as [`CommunityFundError`].
//! Per-submission pool failures are deliberately absent here as errors of
//! the pass: they are recorded in the synchronization report and retried
//! on the next call.

use shared_types::{UserId, VoteType};
use thiserror::Error;

/// Failures of the vote store port.
#[derive(Debug, Error)]
pub enum VoteStoreError {
    /// Read failed.
    #[error("Vote store read failed: {0}")]
    ReadFailed(String),

    /// Write failed. For batches the store guarantees nothing was applied.
    #[error("Vote store write failed: {0}")]
    WriteFailed(String),

    /// Stored bytes did not decode as a vote record.
    #[error("Corrupted vote record: {0}")]
    Corrupted(String),
}

/// Failures of the address book port.
#[derive(Debug, Error)]
pub enum AddressLookupError {
    /// The address book could not be read.
    #[error("Address book read failed: {0}")]
    ReadFailed(String),

    /// The lookup did not answer within its deadline.
    #[error("Address lookup timed out after {timeout_ms}ms")]
    Timeout {
        /// Deadline that expired
        timeout_ms: u64,
    },
}

/// Failure of a single pool submission.
///
/// Never terminal for a synchronization pass: the pass records the
/// rejection against the (address, vote) pair and keeps going.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("Pool request failed: {0}")]
    Transport(String),

    /// The pool answered with a non-success status.
    #[error("Pool rejected vote: HTTP {status}")]
    Rejected {
        /// HTTP status the pool returned
        status: u16,
    },

    /// The pool's answer could not be parsed.
    #[error("Unexpected pool response: {0}")]
    InvalidResponse(String),
}

/// Terminal failures of a synchronization pass.
#[derive(Debug, Error)]
pub enum CommunityFundError {
    /// The stored baseline could not be read; nothing was written.
    #[error("Failed to fetch {vote_type} votes: {source}")]
    VotesFetchFailed {
        /// Which ballot class the fetch was for
        vote_type: VoteType,
        /// Underlying store failure
        #[source]
        source: VoteStoreError,
    },

    /// The batch upsert failed; the store holds none of the batch.
    #[error("Failed to persist vote batch: {0}")]
    BatchPersistFailed(#[from] VoteStoreError),

    /// The user's spending addresses could not be resolved. The batch is
    /// already durable, so the next pass retries propagation.
    #[error("Failed to resolve spending addresses for user {user_id}: {source}")]
    AddressLookupFailed {
        /// User whose addresses were requested
        user_id: UserId,
        /// Underlying lookup failure
        #[source]
        source: AddressLookupError,
    },

    /// More intents than one batch may carry.
    #[error("Vote batch too large: {got} intents, max {max}")]
    BatchTooLarge {
        /// Intents submitted
        got: usize,
        /// Configured ceiling
        max: usize,
    },
}
