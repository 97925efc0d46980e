//! Relay request builder and relay server client.
//!
//! - Build relay requests with worst-case calldata sizing
//! - Negotiate fees against the relay server's limits
//! - Submit signed envelopes to the relay server
//! - Wait for the relayed transaction to be mined

pub mod builder;
pub mod confirm;
pub mod envelope;
pub mod fees;
pub mod relay_client;

pub use builder::{RelayRequestBuilder, TransactionDetails};
pub use confirm::{await_confirmation, signed_tx_hash, ConfirmationPolicy};
pub use envelope::{HttpRelayEnvelope, RelayMetadata};
pub use fees::{negotiate_fees, GetAddrResponse, NegotiatedFees, RelayServerConfig};
pub use relay_client::{RelayHttpClient, RelayResponse};
