//! End-to-end relay orchestration.
//!
//! One run is a fixed sequence of stages:
//! encode call → estimate → fetch relay config → negotiate fees → build request
//! → sign → derive id → assemble envelope → submit → await confirmation.
//! Any stage failure ends the run; nothing is retried.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use gasless_chain::ChainClient;
use gasless_crypto::{relay_request_id, sign_relay_request, Account};
use gasless_tx::{
    await_confirmation, negotiate_fees, ConfirmationPolicy, HttpRelayEnvelope, RelayHttpClient,
    RelayRequestBuilder, TransactionDetails,
};
use gasless_types::abi::ITokenFaucet;
use gasless_types::{NetworkConfig, RelayError, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub mod explorer;

pub use explorer::{explorer_links, ExplorerLinks};

/// The call to relay on the sender's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCall {
    /// `claim()` on the network's token faucet.
    FaucetClaim,
    /// Arbitrary calldata against any contract.
    Custom { to: Address, data: Bytes },
}

impl TargetCall {
    /// Resolve to `(to, calldata)` for `config`.
    pub fn encode(&self, config: &NetworkConfig) -> Result<(Address, Bytes)> {
        match self {
            TargetCall::FaucetClaim => {
                let faucet = config.token_faucet_address.ok_or_else(|| {
                    RelayError::Config(format!("{}: token_faucet_address is not set", config.name))
                })?;
                Ok((faucet, ITokenFaucet::claimCall {}.abi_encode().into()))
            }
            TargetCall::Custom { to, data } => Ok((*to, data.clone())),
        }
    }
}

/// Result of a confirmed relay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub sender: Address,
    pub relay_request_id: B256,
    pub tx_hash: B256,
    pub links: Option<ExplorerLinks>,
}

/// Drives a single relay run against one network.
pub struct RelayPipeline {
    config: NetworkConfig,
    chain: Arc<dyn ChainClient>,
    relay: RelayHttpClient,
    policy: ConfirmationPolicy,
}

impl RelayPipeline {
    pub fn new(
        config: NetworkConfig,
        chain: Arc<dyn ChainClient>,
        relay: RelayHttpClient,
        policy: ConfirmationPolicy,
    ) -> Self {
        Self { config, chain, relay, policy }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Relay `call` from `account` and wait for it to be mined.
    pub async fn run(
        &self,
        account: &Account,
        call: &TargetCall,
        cancel: &CancellationToken,
    ) -> Result<RelayOutcome> {
        let chain = self.chain.as_ref();
        let sender = account.address();

        let (to, data) = call.encode(&self.config)?;
        let gas = chain.estimate_gas(sender, to, &data).await?;
        let fee_data = chain.fee_data().await?;
        debug!(%to, gas, "estimated target call");

        let server = self.relay.fetch_server_config().await?;
        if !server.ready {
            return Err(RelayError::RelayRejected {
                status: None,
                reason: "relay server not ready".into(),
            });
        }
        if server.chain_id != self.config.chain_id {
            return Err(RelayError::Config(format!(
                "relay server is on chain {}, network {} is chain {}",
                server.chain_id, self.config.name, self.config.chain_id
            )));
        }

        // Per-run copy; the base config keeps its own worker address.
        let config = self.config.with_relay_worker(server.relay_worker_address);

        let mut tx = TransactionDetails {
            from: sender,
            to,
            data,
            value: U256::ZERO,
            gas,
            max_fee_per_gas: U256::from(fee_data.max_fee_per_gas),
            max_priority_fee_per_gas: U256::from(fee_data.max_priority_fee_per_gas),
            paymaster_data: None,
        };
        let fees = negotiate_fees(&server);
        fees.apply_to(&mut tx);
        info!(
            max_fee_per_gas = %fees.max_fee_per_gas,
            max_priority_fee_per_gas = %fees.max_priority_fee_per_gas,
            "negotiated relay fees"
        );

        let relay_request = RelayRequestBuilder::new(&config, chain).build(&tx).await?;
        let signature = sign_relay_request(
            &relay_request,
            &config.domain_separator_name,
            config.chain_id,
            account,
        )?;
        let request_id =
            relay_request_id(relay_request.request.from, relay_request.request.nonce, &signature);

        let envelope = HttpRelayEnvelope::assemble(relay_request, signature, &config, chain)
            .await?
            .with_request_id(request_id);
        info!(relay_request_id = %request_id, "submitting relay request");

        let signed_tx = self.relay.submit(&envelope).await?;
        let tx_hash = await_confirmation(&signed_tx, chain, &self.policy, cancel).await?;
        info!(%tx_hash, "relayed transaction confirmed");

        Ok(RelayOutcome {
            sender,
            relay_request_id: request_id,
            tx_hash,
            links: explorer_links(config.chain_id, config.explorer_url.as_deref(), tx_hash, sender),
        })
    }
}
