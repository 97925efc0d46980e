//! Key handling and signatures for relay requests.
//!
//! - `keys`: sender accounts from a mnemonic or raw key
//! - `typed_data`: EIP-712 signing of a relay request, bound to the forwarder
//! - `request_id`: the relay request identifier the relay server expects

pub mod keys;
pub mod request_id;
pub mod typed_data;

pub use keys::Account;
pub use request_id::relay_request_id;
pub use typed_data::sign_relay_request;
