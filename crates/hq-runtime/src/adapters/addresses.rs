//! # Stored Address Book
//!
//! [`AddressResolver`] implementation over the vote database. Address lists
//! live under the `addr:` keyspace, written when a user registers their
//! staking addresses with the pool HQ (derivation happens wallet-side).

use std::sync::Arc;

use async_trait::async_trait;
use hq_community_fund::ports::outbound::AddressResolver;
use hq_community_fund::AddressLookupError;
use parking_lot::RwLock;
use rocksdb::DB;
use shared_types::{SpendingAddress, UserId};
use thiserror::Error;

/// Failures of the address-book write path.
#[derive(Debug, Error)]
pub enum AddressBookError {
    /// The address list could not be written.
    #[error("Address book write failed: {0}")]
    WriteFailed(String),
}

/// Address book over the shared vote database.
pub struct StoredAddressResolver {
    db: Arc<RwLock<DB>>,
}

impl StoredAddressResolver {
    /// Create an address book over an already opened database.
    pub fn new(db: Arc<RwLock<DB>>) -> Self {
        Self { db }
    }

    fn key(user_id: &UserId) -> Vec<u8> {
        format!("addr:{}", user_id).into_bytes()
    }

    /// Replace the user's registered address list.
    pub fn register_addresses(
        &self,
        user_id: &UserId,
        addresses: &[SpendingAddress],
    ) -> Result<(), AddressBookError> {
        let value = bincode::serialize(addresses)
            .map_err(|e| AddressBookError::WriteFailed(e.to_string()))?;

        let db = self.db.write();
        db.put(Self::key(user_id), value)
            .map_err(|e| AddressBookError::WriteFailed(e.to_string()))
    }
}

#[async_trait]
impl AddressResolver for StoredAddressResolver {
    async fn addresses_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SpendingAddress>, AddressLookupError> {
        let db = self.db.read();
        let value = db
            .get(Self::key(user_id))
            .map_err(|e| AddressLookupError::ReadFailed(e.to_string()))?;

        match value {
            // No entry means the user registered nothing yet
            None => Ok(Vec::new()),
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| AddressLookupError::ReadFailed(format!("corrupted address list: {}", e))),
        }
    }
}
