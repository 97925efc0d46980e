//! Relay request identifier.
//!
//! id = keccak256(abi.encode(address from, uint256 nonce, bytes signature))
//! with the first 4 bytes overwritten by zeros.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use sha3::{Digest, Keccak256};

/// Leading bytes of the digest reserved as a zero prefix.
pub const ID_PREFIX_LEN: usize = 4;

/// ABI encoding hashed into the identifier.
pub fn id_preimage(from: Address, nonce: U256, signature: &[u8]) -> Vec<u8> {
    (from, nonce, Bytes::copy_from_slice(signature)).abi_encode_params()
}

pub fn relay_request_id(from: Address, nonce: U256, signature: &[u8]) -> B256 {
    let digest: [u8; 32] = Keccak256::digest(id_preimage(from, nonce, signature)).into();
    let mut id = B256::from(digest);
    id[..ID_PREFIX_LEN].fill(0);
    id
}
