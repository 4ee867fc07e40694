//! Pool API adapter.
//!
//! Reqwest-backed implementation of [`VoteSubmitter`] talking to a pool
//! node, plus the statistics call the runtime uses for its startup
//! reachability probe. Every request is scoped to the configured network
//! and bounded by the configured timeouts, so a stalled pool surfaces as
//! an ordinary submission failure instead of hanging the pass.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared_types::{SpendingAddress, VoteHash};

use crate::domain::SubmitError;
use crate::ports::outbound::VoteSubmitter;

/// Pool API client configuration.
#[derive(Clone, Debug)]
pub struct PoolApiConfig {
    /// Base URL of the pool node, without a trailing slash
    pub base_url: String,
    /// Network every call is scoped to (e.g. "mainnet", "testnet")
    pub network: String,
    /// Per-request deadline in seconds
    pub timeout_secs: u64,
    /// Connect deadline in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PoolApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            network: "mainnet".to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
        }
    }
}

/// Pool statistics as reported by the pool node.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolStats {
    /// Whether the pool currently accepts community-fund votes.
    pub voting_enabled: bool,
    /// Addresses staking through the pool.
    pub address_count: u64,
}

/// Reqwest-backed pool API client.
pub struct PoolApiClient {
    client: Client,
    config: PoolApiConfig,
}

impl PoolApiClient {
    /// Create a new pool API client.
    pub fn new(config: PoolApiConfig) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The network this client casts votes on.
    pub fn network(&self) -> &str {
        &self.config.network
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.config.base_url, self.config.network, path)
    }

    async fn post_vote(
        &self,
        path: &str,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError> {
        let body = serde_json::json!({
            "address": address.as_str(),
            "hash": hash.as_str(),
            "vote": choice_token,
        });

        let response = self.client.post(self.url(path)).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(SubmitError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    /// Current pool statistics.
    pub async fn pool_stats(&self) -> Result<PoolStats, SubmitError> {
        let response = self.client.get(self.url("pool/stats")).send().await?;

        if !response.status().is_success() {
            return Err(SubmitError::Rejected {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<PoolStats>()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))
    }

    /// Check whether the pool answers at all.
    pub async fn is_reachable(&self) -> bool {
        self.pool_stats().await.is_ok()
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            SubmitError::Transport(format!("cannot connect to pool: {}", err))
        } else if err.is_timeout() {
            SubmitError::Transport(format!("pool request timed out: {}", err))
        } else {
            SubmitError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl VoteSubmitter for PoolApiClient {
    async fn submit_proposal_vote(
        &self,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError> {
        self.post_vote("community-fund/proposal/vote", address, hash, choice_token)
            .await
    }

    async fn submit_payment_request_vote(
        &self,
        address: &SpendingAddress,
        hash: &VoteHash,
        choice_token: &str,
    ) -> Result<(), SubmitError> {
        self.post_vote(
            "community-fund/payment-request/vote",
            address,
            hash,
            choice_token,
        )
        .await
    }
}
