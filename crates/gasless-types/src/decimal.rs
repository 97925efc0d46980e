//! Serde adapter for unsigned integers carried as decimal strings on the wire.
//!
//! Deserialization also accepts `0x`-prefixed hex and plain JSON numbers,
//! which relay servers occasionally return for fee and chain id fields.

use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Text(String),
    Number(u64),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => parse_u256(&s).map_err(de::Error::custom),
        Raw::Number(n) => Ok(U256::from(n)),
    }
}

/// Parse a decimal or `0x`-prefixed hex string into a `U256`.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("empty integer string".into());
    }
    let parsed = match trimmed.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(trimmed, 10),
    };
    parsed.map_err(|e| format!("invalid integer {trimmed:?}: {e}"))
}
