//! Waiting for a relayed transaction to land on chain.
//!
//! txHash = keccak256(signedTx)
//!
//! The wait is bounded by `max_wait` and can be cancelled; the relay server
//! and the chain are independent and either can stall.

use std::time::Duration;

use alloy_primitives::B256;
use gasless_chain::ChainClient;
use gasless_types::{RelayError, Result};
use sha3::{Digest, Keccak256};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(300),
        }
    }
}

/// Hash of a signed raw transaction.
pub fn signed_tx_hash(signed_tx: &[u8]) -> B256 {
    let digest: [u8; 32] = Keccak256::digest(signed_tx).into();
    B256::from(digest)
}

async fn poll_until_confirmed(
    chain: &dyn ChainClient,
    tx_hash: B256,
    poll_interval: Duration,
) -> Result<()> {
    let mut polls = 0u32;
    loop {
        if chain.transaction_confirmed(tx_hash).await? {
            return Ok(());
        }
        polls += 1;
        debug!(%tx_hash, polls, "transaction not confirmed yet");
        tokio::time::sleep(poll_interval).await;
    }
}

/// Wait until the transaction behind `signed_tx` is mined, returning its hash.
pub async fn await_confirmation(
    signed_tx: &[u8],
    chain: &dyn ChainClient,
    policy: &ConfirmationPolicy,
    cancel: &CancellationToken,
) -> Result<B256> {
    let tx_hash = signed_tx_hash(signed_tx);
    info!(%tx_hash, max_wait = ?policy.max_wait, "waiting for transaction");

    tokio::select! {
        _ = cancel.cancelled() => Err(RelayError::Cancelled),
        outcome = tokio::time::timeout(
            policy.max_wait,
            poll_until_confirmed(chain, tx_hash, policy.poll_interval),
        ) => match outcome {
            Ok(confirmed) => confirmed.map(|()| tx_hash),
            Err(_) => Err(RelayError::Timeout(policy.max_wait)),
        },
    }
}
