//! Per-network relay parameters.
//!
//! A `NetworkConfig` is loaded once and never edited. Values refreshed from
//! the relay server at run time produce a derived copy.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{RelayError, Result};

/// Chain id of the Polygon Mumbai test network.
pub const MUMBAI_CHAIN_ID: u64 = 80001;

/// Chain id of Polygon mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub relay_url: String,
    pub forwarder_address: Address,
    pub paymaster_address: Address,
    pub relay_hub_address: Address,
    #[serde(default)]
    pub relay_worker_address: Address,
    #[serde(default)]
    pub token_faucet_address: Option<Address>,
    #[serde(default = "default_gtx_data_zero")]
    pub gtx_data_zero: u64,
    #[serde(default = "default_gtx_data_non_zero")]
    pub gtx_data_non_zero: u64,
    #[serde(default = "default_request_valid_seconds")]
    pub request_valid_seconds: u64,
    #[serde(default = "default_max_data_length")]
    pub max_paymaster_data_length: usize,
    #[serde(default = "default_max_data_length")]
    pub max_approval_data_length: usize,
    #[serde(default = "default_max_relay_nonce_gap")]
    pub max_relay_nonce_gap: u64,
    #[serde(default = "default_max_acceptance_budget")]
    pub max_acceptance_budget: u64,
    #[serde(default = "default_domain_separator_name")]
    pub domain_separator_name: String,
    /// Block explorer base URL, used for chains without a built-in explorer.
    #[serde(default)]
    pub explorer_url: Option<String>,
}

fn default_gtx_data_zero() -> u64 {
    4
}

fn default_gtx_data_non_zero() -> u64 {
    16
}

fn default_request_valid_seconds() -> u64 {
    172_800
}

fn default_max_data_length() -> usize {
    300
}

fn default_max_relay_nonce_gap() -> u64 {
    3
}

fn default_max_acceptance_budget() -> u64 {
    285_252
}

fn default_domain_separator_name() -> String {
    "GSN Relayed Transaction".to_string()
}

impl NetworkConfig {
    /// Derive a copy that routes through `relay_worker`.
    pub fn with_relay_worker(&self, relay_worker: Address) -> Self {
        Self { relay_worker_address: relay_worker, ..self.clone() }
    }

    pub fn is_test_network(&self) -> bool {
        self.chain_id == MUMBAI_CHAIN_ID
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("rpc_url", &self.rpc_url), ("relay_url", &self.relay_url)] {
            url::Url::parse(value).map_err(|e| {
                RelayError::Config(format!("{}: invalid {field} {value:?}: {e}", self.name))
            })?;
        }

        for (field, value) in [
            ("forwarder_address", self.forwarder_address),
            ("paymaster_address", self.paymaster_address),
            ("relay_hub_address", self.relay_hub_address),
        ] {
            if value.is_zero() {
                return Err(RelayError::Config(format!("{}: {field} is not set", self.name)));
            }
        }

        if self.gtx_data_zero == 0 || self.gtx_data_non_zero == 0 {
            return Err(RelayError::Config(format!(
                "{}: calldata gas constants must be non-zero",
                self.name
            )));
        }
        if self.chain_id == 0 {
            return Err(RelayError::Config(format!("{}: chain_id is not set", self.name)));
        }
        Ok(())
    }
}
