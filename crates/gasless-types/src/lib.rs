//! Shared types for the gasless relay client.
//!
//! - Error taxonomy used by every stage of the relay pipeline
//! - The signed relay request data model
//! - Per-network configuration

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub mod abi;
pub mod decimal;
pub mod network;
pub mod request;

pub use network::NetworkConfig;
pub use request::{ForwardRequest, RelayData, RelayRequest};

/// Relay pipeline error types.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Schema(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("calldata cost {cost} exceeds available gas {gas}")]
    Arithmetic { gas: u64, cost: u64 },

    #[error("relay rejected the request (status {status:?}): {reason}")]
    RelayRejected { status: Option<u16>, reason: String },

    #[error("no confirmation after {0:?}")]
    Timeout(Duration),

    #[error("cancelled while waiting for confirmation")]
    Cancelled,
}

/// Coarse error classification reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Schema,
    Signing,
    Arithmetic,
    RelayRejected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Config => "ConfigError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Schema => "SchemaError",
            ErrorKind::Signing => "SigningError",
            ErrorKind::Arithmetic => "ArithmeticError",
            ErrorKind::RelayRejected => "RelayRejectedError",
        };
        f.write_str(name)
    }
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::Config(_) => ErrorKind::Config,
            RelayError::Network(_) | RelayError::Timeout(_) | RelayError::Cancelled => {
                ErrorKind::Network
            }
            RelayError::Schema(_) => ErrorKind::Schema,
            RelayError::Signing(_) => ErrorKind::Signing,
            RelayError::Arithmetic { .. } => ErrorKind::Arithmetic,
            RelayError::RelayRejected { .. } => ErrorKind::RelayRejected,
        }
    }

    /// Short human-readable reason, when the failure carries one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            RelayError::RelayRejected { reason, .. } if !reason.is_empty() => Some(reason),
            RelayError::Config(msg) => Some(msg),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
