//! EIP-712 signing of relay requests.
//!
//! Domain: { name: domainSeparatorName, version: "3", chainId, verifyingContract: forwarder }
//!
//! The signed `RelayRequest` type flattens the forward request fields and
//! nests `RelayData`, matching what the forwarder contract hashes on chain.

use alloy_primitives::{Address, Bytes, Signature, B256, U256};
use alloy_signer::SignerSync;
use alloy_sol_types::{Eip712Domain, SolStruct};
use gasless_types::abi;
use gasless_types::{RelayError, RelayRequest, Result};

use crate::keys::Account;

/// Domain separator version of the forwarder contract.
pub const DOMAIN_VERSION: &str = "3";

pub fn domain(domain_separator_name: &str, chain_id: u64, forwarder: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(domain_separator_name.to_string().into()),
        Some(DOMAIN_VERSION.into()),
        Some(U256::from(chain_id)),
        Some(forwarder),
        None,
    )
}

/// The EIP-712 digest the sender signs.
pub fn signing_hash(relay_request: &RelayRequest, domain_separator_name: &str, chain_id: u64) -> B256 {
    let domain = domain(domain_separator_name, chain_id, relay_request.relay_data.forwarder);
    abi::RelayRequest::from(relay_request).eip712_signing_hash(&domain)
}

/// Sign a relay request with the account's key, returning a 65-byte signature.
pub fn sign_relay_request(
    relay_request: &RelayRequest,
    domain_separator_name: &str,
    chain_id: u64,
    account: &Account,
) -> Result<Bytes> {
    let hash = signing_hash(relay_request, domain_separator_name, chain_id);
    let signature = account
        .signer()
        .sign_hash_sync(&hash)
        .map_err(|e| RelayError::Signing(e.to_string()))?;
    Ok(Bytes::copy_from_slice(&signature.as_bytes()))
}

/// Recover the address that produced `signature` over `relay_request`.
pub fn recover_signer(
    relay_request: &RelayRequest,
    domain_separator_name: &str,
    chain_id: u64,
    signature: &[u8],
) -> Result<Address> {
    let signature = Signature::try_from(signature)
        .map_err(|e| RelayError::Signing(format!("malformed signature: {e}")))?;
    let hash = signing_hash(relay_request, domain_separator_name, chain_id);
    signature
        .recover_address_from_prehash(&hash)
        .map_err(|e| RelayError::Signing(format!("signature recovery failed: {e}")))
}
