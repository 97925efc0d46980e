//! In-memory chain client for testing.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use gasless_types::{RelayError, Result};

use crate::{ChainClient, FeeData};

#[derive(Default)]
struct ChainState {
    forwarder_nonces: HashMap<(Address, Address), U256>,
    gas_estimate: u64,
    fee_data: FeeData,
    transaction_counts: HashMap<Address, u64>,
    /// Receipt polls remaining before a hash reports as confirmed.
    pending: HashMap<B256, u32>,
    estimate_calls: Vec<(Address, Address, Bytes)>,
    unreachable: bool,
}

/// In-memory chain client (for testing and dry runs).
pub struct MemoryChain {
    state: Mutex<ChainState>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self { state: Mutex::new(ChainState::default()) }
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_reachable(state: &ChainState) -> Result<()> {
        if state.unreachable {
            return Err(RelayError::Network("chain rpc unreachable".into()));
        }
        Ok(())
    }

    pub fn set_forwarder_nonce(&self, forwarder: Address, from: Address, nonce: U256) {
        self.state().forwarder_nonces.insert((forwarder, from), nonce);
    }

    pub fn set_gas_estimate(&self, gas: u64) {
        self.state().gas_estimate = gas;
    }

    pub fn set_fee_data(&self, fee_data: FeeData) {
        self.state().fee_data = fee_data;
    }

    pub fn set_transaction_count(&self, address: Address, count: u64) {
        self.state().transaction_counts.insert(address, count);
    }

    /// Report `tx_hash` as confirmed after `polls` unconfirmed lookups.
    pub fn confirm_after(&self, tx_hash: B256, polls: u32) {
        self.state().pending.insert(tx_hash, polls);
    }

    /// Make every call fail with a network error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    /// `(from, to, data)` of every gas estimation request, in order.
    pub fn estimate_calls(&self) -> Vec<(Address, Address, Bytes)> {
        self.state().estimate_calls.clone()
    }
}

impl Default for MemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for MemoryChain {
    async fn forwarder_nonce(&self, forwarder: Address, from: Address) -> Result<U256> {
        let state = self.state();
        Self::check_reachable(&state)?;
        Ok(state.forwarder_nonces.get(&(forwarder, from)).copied().unwrap_or_default())
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: &Bytes) -> Result<u64> {
        let mut state = self.state();
        Self::check_reachable(&state)?;
        state.estimate_calls.push((from, to, data.clone()));
        Ok(state.gas_estimate)
    }

    async fn fee_data(&self) -> Result<FeeData> {
        let state = self.state();
        Self::check_reachable(&state)?;
        Ok(state.fee_data)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let state = self.state();
        Self::check_reachable(&state)?;
        Ok(state.transaction_counts.get(&address).copied().unwrap_or_default())
    }

    async fn transaction_confirmed(&self, tx_hash: B256) -> Result<bool> {
        let mut state = self.state();
        Self::check_reachable(&state)?;
        match state.pending.get_mut(&tx_hash) {
            Some(0) => Ok(true),
            Some(remaining) => {
                *remaining -= 1;
                Ok(false)
            }
            None => Ok(false),
        }
    }
}
