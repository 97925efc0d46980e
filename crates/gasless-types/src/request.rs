//! The relay request: the unit that is signed by the sender and handed to a relay server.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The inner call the forwarder contract executes on behalf of `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    pub from: Address,
    pub to: Address,
    #[serde(with = "crate::decimal")]
    pub value: U256,
    #[serde(with = "crate::decimal")]
    pub gas: U256,
    /// Forwarder-tracked per-sender counter.
    #[serde(with = "crate::decimal")]
    pub nonce: U256,
    pub data: Bytes,
    /// Unix seconds after which the forwarder rejects the request.
    #[serde(with = "crate::decimal")]
    pub valid_until_time: U256,
}

/// Relay-specific economics and routing layered over the forward request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayData {
    #[serde(with = "crate::decimal")]
    pub max_fee_per_gas: U256,
    #[serde(with = "crate::decimal")]
    pub max_priority_fee_per_gas: U256,
    /// Calldata gas of the final on-chain `relayCall`.
    #[serde(with = "crate::decimal")]
    pub transaction_calldata_gas_used: U256,
    pub relay_worker: Address,
    pub paymaster: Address,
    pub forwarder: Address,
    pub paymaster_data: Bytes,
    #[serde(with = "crate::decimal")]
    pub client_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub request: ForwardRequest,
    pub relay_data: RelayData,
}
