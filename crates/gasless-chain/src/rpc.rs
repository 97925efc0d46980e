//! JSON-RPC chain client backed by an alloy HTTP provider.

use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall, SolValue};
use async_trait::async_trait;
use gasless_types::{RelayError, Result};
use tracing::debug;

use crate::{ChainClient, FeeData};

sol! {
    interface IForwarder {
        function getNonce(address from) external view returns (uint256);
    }
}

pub struct RpcChainClient {
    provider: RootProvider,
}

impl RpcChainClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| RelayError::Config(format!("invalid rpc url {rpc_url:?}: {e}")))?;
        Ok(Self { provider: RootProvider::new_http(url) })
    }

    fn call_request(from: Option<Address>, to: Address, data: Bytes) -> TransactionRequest {
        TransactionRequest {
            from,
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(data),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn forwarder_nonce(&self, forwarder: Address, from: Address) -> Result<U256> {
        let data = IForwarder::getNonceCall { from }.abi_encode();
        let ret = self
            .provider
            .call(Self::call_request(None, forwarder, data.into()))
            .await
            .map_err(|e| RelayError::Network(format!("forwarder getNonce failed: {e}")))?;
        let nonce = U256::abi_decode(&ret)
            .map_err(|e| RelayError::Schema(format!("bad getNonce return data: {e}")))?;
        debug!(%forwarder, %from, %nonce, "forwarder nonce");
        Ok(nonce)
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: &Bytes) -> Result<u64> {
        self.provider
            .estimate_gas(Self::call_request(Some(from), to, data.clone()))
            .await
            .map_err(|e| RelayError::Network(format!("gas estimation failed: {e}")))
    }

    async fn fee_data(&self) -> Result<FeeData> {
        let estimate = self
            .provider
            .estimate_eip1559_fees()
            .await
            .map_err(|e| RelayError::Network(format!("fee estimation failed: {e}")))?;
        Ok(FeeData {
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        })
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| RelayError::Network(format!("transaction count for {address} failed: {e}")))
    }

    async fn transaction_confirmed(&self, tx_hash: B256) -> Result<bool> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| RelayError::Network(format!("receipt lookup for {tx_hash} failed: {e}")))?;
        Ok(receipt.is_some())
    }
}
