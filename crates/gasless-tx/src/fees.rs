//! Relay server configuration and fee negotiation.
//!
//! The `/getaddr` body is deserialized into [`GetAddrResponse`] and narrowed
//! into a typed `RelayServerConfig`; nothing downstream reads the raw JSON.

use alloy_primitives::{Address, U256};
use gasless_types::network::MUMBAI_CHAIN_ID;
use gasless_types::{decimal, RelayError, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::builder::TransactionDetails;

/// Body of `GET /getaddr`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAddrResponse {
    pub relay_worker_address: Address,
    pub relay_manager_address: Address,
    pub relay_hub_address: Address,
    pub owner_address: Address,
    #[serde(with = "decimal")]
    pub min_max_priority_fee_per_gas: U256,
    #[serde(with = "decimal")]
    pub max_max_fee_per_gas: U256,
    #[serde(with = "decimal")]
    pub min_max_fee_per_gas: U256,
    #[serde(with = "decimal")]
    pub max_acceptance_budget: U256,
    #[serde(with = "decimal")]
    pub chain_id: U256,
    #[serde(with = "decimal")]
    pub network_id: U256,
    pub ready: bool,
    pub version: String,
}

/// Live relay server parameters from `GET /getaddr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayServerConfig {
    pub relay_worker_address: Address,
    pub relay_manager_address: Address,
    pub relay_hub_address: Address,
    pub owner_address: Address,
    pub min_max_priority_fee_per_gas: U256,
    pub max_max_fee_per_gas: U256,
    pub min_max_fee_per_gas: U256,
    pub max_acceptance_budget: U256,
    pub chain_id: u64,
    pub network_id: u64,
    pub ready: bool,
    pub version: String,
}

fn narrow_u64(name: &str, value: U256) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| RelayError::Schema(format!("getaddr field {name} out of range: {value}")))
}

impl TryFrom<GetAddrResponse> for RelayServerConfig {
    type Error = RelayError;

    fn try_from(resp: GetAddrResponse) -> Result<Self> {
        Ok(Self {
            relay_worker_address: resp.relay_worker_address,
            relay_manager_address: resp.relay_manager_address,
            relay_hub_address: resp.relay_hub_address,
            owner_address: resp.owner_address,
            min_max_priority_fee_per_gas: resp.min_max_priority_fee_per_gas,
            max_max_fee_per_gas: resp.max_max_fee_per_gas,
            min_max_fee_per_gas: resp.min_max_fee_per_gas,
            max_acceptance_budget: resp.max_acceptance_budget,
            chain_id: narrow_u64("chainId", resp.chain_id)?,
            network_id: narrow_u64("networkId", resp.network_id)?,
            ready: resp.ready,
            version: resp.version,
        })
    }
}

impl RelayServerConfig {
    /// Parse and validate a `/getaddr` body.
    pub fn from_json(body: &str) -> Result<Self> {
        let resp: GetAddrResponse = serde_json::from_str(body)
            .map_err(|e| RelayError::Schema(format!("failed to parse getaddr response: {e}")))?;
        resp.try_into()
    }
}

/// Fee caps attached to a relay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedFees {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

impl NegotiatedFees {
    /// Replace the chain-suggested caps on `tx` with the negotiated ones.
    pub fn apply_to(&self, tx: &mut TransactionDetails) {
        debug!(
            chain_max_fee_per_gas = %tx.max_fee_per_gas,
            chain_max_priority_fee_per_gas = %tx.max_priority_fee_per_gas,
            "overriding chain fee suggestion"
        );
        tx.max_fee_per_gas = self.max_fee_per_gas;
        tx.max_priority_fee_per_gas = self.max_priority_fee_per_gas;
    }
}

/// Pad the server's priority fee floor by 40%, rounded to the nearest wei.
pub fn padded_priority_fee(min_max_priority_fee_per_gas: U256) -> U256 {
    (min_max_priority_fee_per_gas * U256::from(14u64) + U256::from(5u64)) / U256::from(10u64)
}

/// Derive the fee caps for a request from the relay server's limits.
///
/// On the Mumbai test network the server's fee cap is unreliable, so both
/// caps use the padded priority fee there.
pub fn negotiate_fees(server: &RelayServerConfig) -> NegotiatedFees {
    let padded = padded_priority_fee(server.min_max_priority_fee_per_gas);
    if server.chain_id == MUMBAI_CHAIN_ID {
        warn!(chain_id = server.chain_id, %padded, "test network: using padded priority fee as max fee");
        return NegotiatedFees { max_fee_per_gas: padded, max_priority_fee_per_gas: padded };
    }
    NegotiatedFees {
        max_fee_per_gas: server.max_max_fee_per_gas,
        max_priority_fee_per_gas: padded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(payload: &Value) -> Result<RelayServerConfig> {
        RelayServerConfig::from_json(&payload.to_string())
    }

    fn payload(chain_id: &str) -> Value {
        json!({
            "relayWorkerAddress": "0xb9950b71ec94cbb274aeb1be98e697678077a17f",
            "relayManagerAddress": "0x1111111111111111111111111111111111111111",
            "relayHubAddress": "0x6666666666666666666666666666666666666666",
            "ownerAddress": "0x2222222222222222222222222222222222222222",
            "minMaxPriorityFeePerGas": "1000000000",
            "maxMaxFeePerGas": "5000000000",
            "minMaxFeePerGas": "1",
            "maxAcceptanceBudget": "285252",
            "chainId": chain_id,
            "networkId": chain_id,
            "ready": true,
            "version": "3.0.0-beta.3"
        })
    }

    #[test]
    fn test_parse_payload() {
        let cfg = parse(&payload("80001")).unwrap();
        assert_eq!(
            cfg.relay_worker_address,
            "0xb9950b71ec94cbb274aeb1be98e697678077a17f".parse::<Address>().unwrap()
        );
        assert_eq!(cfg.min_max_priority_fee_per_gas, U256::from(1_000_000_000u64));
        assert_eq!(cfg.max_acceptance_budget, U256::from(285_252u64));
        assert_eq!(cfg.chain_id, 80001);
        assert!(cfg.ready);
        assert_eq!(cfg.version, "3.0.0-beta.3");
    }

    #[test]
    fn test_parse_tolerates_numeric_chain_id() {
        let mut p = payload("137");
        p["chainId"] = json!(137);
        assert_eq!(parse(&p).unwrap().chain_id, 137);
    }

    #[test]
    fn test_parse_rejects_missing_and_malformed_fields() {
        let mut missing = payload("137");
        missing.as_object_mut().unwrap().remove("maxMaxFeePerGas");
        assert!(matches!(parse(&missing), Err(RelayError::Schema(_))));

        let mut null = payload("137");
        null["relayWorkerAddress"] = Value::Null;
        assert!(matches!(parse(&null), Err(RelayError::Schema(_))));

        let mut bad_address = payload("137");
        bad_address["relayWorkerAddress"] = json!("0x1234");
        assert!(matches!(parse(&bad_address), Err(RelayError::Schema(_))));

        let mut bad_fee = payload("137");
        bad_fee["minMaxPriorityFeePerGas"] = json!("1.5 gwei");
        assert!(matches!(parse(&bad_fee), Err(RelayError::Schema(_))));

        let mut bad_ready = payload("137");
        bad_ready["ready"] = json!("yes");
        assert!(matches!(parse(&bad_ready), Err(RelayError::Schema(_))));

        assert!(matches!(parse(&json!([])), Err(RelayError::Schema(_))));

        let mut huge_chain = payload("137");
        huge_chain["chainId"] = json!("18446744073709551616");
        assert!(matches!(parse(&huge_chain), Err(RelayError::Schema(_))));
    }

    #[test]
    fn test_negotiate_fees_test_network() {
        let server = parse(&payload("80001")).unwrap();
        let fees = negotiate_fees(&server);
        assert_eq!(fees.max_priority_fee_per_gas, U256::from(1_400_000_000u64));
        assert_eq!(fees.max_fee_per_gas, U256::from(1_400_000_000u64));
    }

    #[test]
    fn test_negotiate_fees_production() {
        let server = parse(&payload("137")).unwrap();
        let fees = negotiate_fees(&server);
        assert_eq!(fees.max_priority_fee_per_gas, U256::from(1_400_000_000u64));
        assert_eq!(fees.max_fee_per_gas, U256::from(5_000_000_000u64));
    }

    #[test]
    fn test_negotiated_fees_override_chain_suggestion() {
        let mut tx = TransactionDetails {
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            data: Default::default(),
            value: U256::ZERO,
            gas: 21_000,
            max_fee_per_gas: U256::from(3_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_000_000_000u64),
            paymaster_data: None,
        };
        let fees = negotiate_fees(&parse(&payload("137")).unwrap());
        fees.apply_to(&mut tx);
        assert_eq!(tx.max_fee_per_gas, U256::from(5_000_000_000u64));
        assert_eq!(tx.max_priority_fee_per_gas, U256::from(1_400_000_000u64));
        assert_eq!(tx.gas, 21_000);
    }

    #[test]
    fn test_padded_priority_fee_rounding() {
        for (floor, expected) in [(0u64, 0u64), (1, 1), (3, 4), (4, 6), (5, 7), (30_000_000_001, 42_000_000_001)] {
            assert_eq!(padded_priority_fee(U256::from(floor)), U256::from(expected), "floor {floor}");
        }
    }
}
