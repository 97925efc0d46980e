//! Block explorer links for a finished relay run.

use alloy_primitives::{Address, B256};
use gasless_types::network::{MUMBAI_CHAIN_ID, POLYGON_CHAIN_ID};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLinks {
    pub tx: String,
    pub address: String,
}

fn known_explorer(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        MUMBAI_CHAIN_ID => Some("https://mumbai.polygonscan.com"),
        POLYGON_CHAIN_ID => Some("https://polygonscan.com"),
        _ => None,
    }
}

/// Links for `tx_hash` and `address`, or `None` when the chain has no known explorer.
pub fn explorer_links(
    chain_id: u64,
    fallback: Option<&str>,
    tx_hash: B256,
    address: Address,
) -> Option<ExplorerLinks> {
    let base = known_explorer(chain_id).or(fallback)?.trim_end_matches('/');
    Some(ExplorerLinks {
        tx: format!("{base}/tx/{tx_hash}"),
        address: format!("{base}/address/{address}"),
    })
}
