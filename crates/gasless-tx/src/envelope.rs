//! The JSON body posted to a relay server's `/relay` endpoint.

use alloy_primitives::{Address, Bytes, B256, U256};
use gasless_chain::ChainClient;
use gasless_types::{decimal, NetworkConfig, RelayError, RelayRequest, Result};
use serde::{Deserialize, Serialize};

/// Submission metadata accompanying the signed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMetadata {
    #[serde(with = "decimal")]
    pub max_acceptance_budget: U256,
    pub relay_hub_address: Address,
    pub signature: Bytes,
    pub approval_data: Bytes,
    pub relay_max_nonce: u64,
    pub relay_last_known_nonce: u64,
    pub domain_separator_name: String,
    pub relay_request_id: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRelayEnvelope {
    pub relay_request: RelayRequest,
    pub metadata: RelayMetadata,
}

impl HttpRelayEnvelope {
    /// Assemble an envelope for a signed request.
    ///
    /// The relay worker's nonce window is read from the chain. The request id
    /// starts zeroed and is attached with [`HttpRelayEnvelope::with_request_id`].
    pub async fn assemble(
        relay_request: RelayRequest,
        signature: Bytes,
        config: &NetworkConfig,
        chain: &dyn ChainClient,
    ) -> Result<Self> {
        let relay_last_known_nonce =
            chain.transaction_count(relay_request.relay_data.relay_worker).await?;
        let relay_max_nonce = relay_last_known_nonce
            .checked_add(config.max_relay_nonce_gap)
            .ok_or_else(|| RelayError::Config("relay nonce window overflows".into()))?;

        Ok(Self {
            relay_request,
            metadata: RelayMetadata {
                max_acceptance_budget: U256::from(config.max_acceptance_budget),
                relay_hub_address: config.relay_hub_address,
                signature,
                approval_data: Bytes::new(),
                relay_max_nonce,
                relay_last_known_nonce,
                domain_separator_name: config.domain_separator_name.clone(),
                relay_request_id: B256::ZERO,
            },
        })
    }

    pub fn with_request_id(mut self, relay_request_id: B256) -> Self {
        self.metadata.relay_request_id = relay_request_id;
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| RelayError::Schema(format!("failed to encode relay envelope: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RelayError::Schema(format!("failed to decode relay envelope: {e}")))
    }
}
