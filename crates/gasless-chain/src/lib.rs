//! Chain-client boundary for the relay pipeline.
//!
//! Defines the `ChainClient` trait: the narrow set of chain reads the pipeline
//! needs. Provides an alloy JSON-RPC implementation and a `MemoryChain` for testing.

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use gasless_types::Result;

pub mod memory;
pub mod rpc;

pub use memory::MemoryChain;
pub use rpc::RpcChainClient;

/// EIP-1559 fee suggestion from the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeData {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Chain reads consumed by the relay pipeline.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The forwarder contract's next nonce for `from`.
    async fn forwarder_nonce(&self, forwarder: Address, from: Address) -> Result<U256>;

    async fn estimate_gas(&self, from: Address, to: Address, data: &Bytes) -> Result<u64>;

    async fn fee_data(&self) -> Result<FeeData>;

    /// Transactions sent from `address` so far.
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Whether a receipt for `tx_hash` exists yet.
    async fn transaction_confirmed(&self, tx_hash: B256) -> Result<bool>;
}
