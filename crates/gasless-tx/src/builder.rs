//! Relay request construction.
//!
//! `transactionCalldataGasUsed` must describe the calldata of the final
//! `relayCall`, which embeds the signature over the request itself. The cost is
//! therefore measured on a worst-case copy whose variable-length fields are
//! filled to their final lengths with non-zero placeholder bytes, and the
//! result is stored on the real request before it is signed.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use gasless_chain::ChainClient;
use gasless_gas::{adjust_gas, calldata_cost};
use gasless_types::abi::{IRelayHub, RelayCallRequest, SIGNATURE_LENGTH};
use gasless_types::{ForwardRequest, NetworkConfig, RelayData, RelayError, RelayRequest, Result};
use tracing::debug;

/// Fill byte for worst-case placeholders; never zero so no field earns the zero-byte discount.
pub const PLACEHOLDER_BYTE: u8 = 0xff;

/// Placeholder for uint fields whose final value is unknown when sizing (`0xffffffffff`).
pub const PLACEHOLDER_UINT: u64 = 0xff_ffff_ffff;

/// Client id stamped on every request.
pub const DEFAULT_CLIENT_ID: u64 = 1;

/// The inner call a sender wants relayed, before relay-specific fields are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetails {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    /// Estimated gas of the call including its calldata cost.
    pub gas: u64,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_data: Option<Bytes>,
}

/// Encode `RelayHub.relayCall` for a request and its attachments.
pub fn relay_call_calldata(
    relay_request: &RelayRequest,
    domain_separator_name: &str,
    max_acceptance_budget: U256,
    signature: &Bytes,
    approval_data: &Bytes,
) -> Bytes {
    IRelayHub::relayCallCall {
        domainSeparatorName: domain_separator_name.to_string(),
        maxAcceptanceBudget: max_acceptance_budget,
        relayRequest: RelayCallRequest::from(relay_request),
        signature: signature.clone(),
        approvalData: approval_data.clone(),
    }
    .abi_encode()
    .into()
}

/// `relayCall` calldata with every not-yet-known field at its worst case.
pub fn worst_case_relay_call(relay_request: &RelayRequest, config: &NetworkConfig) -> Bytes {
    let mut worst = relay_request.clone();
    worst.relay_data.transaction_calldata_gas_used = U256::from(PLACEHOLDER_UINT);
    worst.relay_data.paymaster_data =
        Bytes::from(vec![PLACEHOLDER_BYTE; config.max_paymaster_data_length]);

    let signature = Bytes::from(vec![PLACEHOLDER_BYTE; SIGNATURE_LENGTH]);
    let approval_data = Bytes::from(vec![PLACEHOLDER_BYTE; config.max_approval_data_length]);

    relay_call_calldata(
        &worst,
        &config.domain_separator_name,
        U256::from(PLACEHOLDER_UINT),
        &signature,
        &approval_data,
    )
}

/// Calldata gas of the final `relayCall`, sized from the worst-case copy.
pub fn transaction_calldata_gas_used(
    relay_request: &RelayRequest,
    config: &NetworkConfig,
) -> Result<u64> {
    let calldata = worst_case_relay_call(relay_request, config);
    calldata_cost(&calldata, config.gtx_data_zero, config.gtx_data_non_zero).ok_or_else(|| {
        RelayError::Config(format!(
            "{}: relayCall calldata cost overflows with gtx constants {}/{}",
            config.name, config.gtx_data_zero, config.gtx_data_non_zero
        ))
    })
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

/// Builds unsigned relay requests for one network.
pub struct RelayRequestBuilder<'a> {
    config: &'a NetworkConfig,
    chain: &'a dyn ChainClient,
}

impl<'a> RelayRequestBuilder<'a> {
    pub fn new(config: &'a NetworkConfig, chain: &'a dyn ChainClient) -> Self {
        Self { config, chain }
    }

    pub async fn build(&self, tx: &TransactionDetails) -> Result<RelayRequest> {
        self.build_at(tx, unix_now()).await
    }

    /// Build a request as of `now` (unix seconds).
    pub async fn build_at(&self, tx: &TransactionDetails, now: u64) -> Result<RelayRequest> {
        let config = self.config;

        // The outer relayCall pays for the inner calldata.
        let gas = adjust_gas(tx.gas, &tx.data, config.gtx_data_zero, config.gtx_data_non_zero)?;

        let valid_until_time = now.checked_add(config.request_valid_seconds).ok_or_else(|| {
            RelayError::Config(format!(
                "request_valid_seconds {} overflows the deadline",
                config.request_valid_seconds
            ))
        })?;

        let nonce = self.chain.forwarder_nonce(config.forwarder_address, tx.from).await?;

        let paymaster_data = tx.paymaster_data.clone().unwrap_or_default();
        if paymaster_data.len() > config.max_paymaster_data_length {
            return Err(RelayError::Config(format!(
                "paymaster data is {} bytes, limit is {}",
                paymaster_data.len(),
                config.max_paymaster_data_length
            )));
        }

        let mut relay_request = RelayRequest {
            request: ForwardRequest {
                from: tx.from,
                to: tx.to,
                value: tx.value,
                gas: U256::from(gas),
                nonce,
                data: tx.data.clone(),
                valid_until_time: U256::from(valid_until_time),
            },
            relay_data: RelayData {
                max_fee_per_gas: tx.max_fee_per_gas,
                max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
                transaction_calldata_gas_used: U256::ZERO,
                relay_worker: config.relay_worker_address,
                paymaster: config.paymaster_address,
                forwarder: config.forwarder_address,
                paymaster_data,
                client_id: U256::from(DEFAULT_CLIENT_ID),
            },
        };

        let calldata_gas = transaction_calldata_gas_used(&relay_request, config)?;
        relay_request.relay_data.transaction_calldata_gas_used = U256::from(calldata_gas);

        debug!(
            from = %tx.from,
            %nonce,
            gas,
            calldata_gas,
            valid_until_time,
            "built relay request"
        );
        Ok(relay_request)
    }
}
