//! Calldata gas accounting.
//!
//! cost = zeros(data) * gtxDataZero + nonzeros(data) * gtxDataNonZero
//!
//! The outer `relayCall` transaction already pays for its calldata, so the
//! gas limit of the inner call is the estimate minus that cost.

use gasless_types::{RelayError, Result};
use tracing::debug;

/// Zero and nonzero byte counts of a calldata buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteCounts {
    pub zero: u64,
    pub nonzero: u64,
}

pub fn count_bytes(data: &[u8]) -> ByteCounts {
    let zero = data.iter().filter(|b| **b == 0).count() as u64;
    ByteCounts { zero, nonzero: data.len() as u64 - zero }
}

/// EVM calldata gas cost of `data`, or `None` if it does not fit in a `u64`.
pub fn calldata_cost(data: &[u8], gtx_data_zero: u64, gtx_data_non_zero: u64) -> Option<u64> {
    let counts = count_bytes(data);
    counts
        .zero
        .checked_mul(gtx_data_zero)?
        .checked_add(counts.nonzero.checked_mul(gtx_data_non_zero)?)
}

/// Remove the calldata component from an estimated gas limit.
///
/// Fails with [`RelayError::Arithmetic`] when the calldata cost exceeds the
/// estimate or overflows; the result never wraps or clamps.
pub fn adjust_gas(
    original_gas: u64,
    calldata: &[u8],
    gtx_data_zero: u64,
    gtx_data_non_zero: u64,
) -> Result<u64> {
    let cost = calldata_cost(calldata, gtx_data_zero, gtx_data_non_zero)
        .ok_or(RelayError::Arithmetic { gas: original_gas, cost: u64::MAX })?;
    let adjusted = original_gas
        .checked_sub(cost)
        .ok_or(RelayError::Arithmetic { gas: original_gas, cost })?;
    debug!(original_gas, cost, adjusted, "removed calldata cost from gas estimate");
    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calldata_cost_vectors_from_json() {
        let data = include_str!("../../../tests/vectors/calldata_cost.json");
        let vectors: Vec<serde_json::Value> = serde_json::from_str(data).unwrap();

        for v in &vectors {
            let name = v["name"].as_str().unwrap();
            let bytes = hex::decode(v["data"].as_str().unwrap().trim_start_matches("0x")).unwrap();
            let zero = v["gtx_data_zero"].as_u64().unwrap();
            let non_zero = v["gtx_data_non_zero"].as_u64().unwrap();

            let counts = count_bytes(&bytes);
            assert_eq!(counts.zero, v["zero_bytes"].as_u64().unwrap(), "zero count for '{}'", name);
            assert_eq!(
                counts.nonzero,
                v["nonzero_bytes"].as_u64().unwrap(),
                "nonzero count for '{}'",
                name
            );

            let cost = calldata_cost(&bytes, zero, non_zero).unwrap();
            assert_eq!(
                cost,
                v["expected_cost"].as_u64().unwrap(),
                "cost mismatch for '{}': got {}",
                name,
                cost
            );
        }
    }

    #[test]
    fn test_cost_is_linear_in_byte_counts() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let counts = count_bytes(&data);
        for (z, n) in [(0, 0), (1, 1), (4, 16), (7, 3)] {
            assert_eq!(calldata_cost(&data, z, n), Some(counts.zero * z + counts.nonzero * n));
        }
    }

    #[test]
    fn test_adjust_gas_scenario() {
        let adjusted = adjust_gas(0x10000, &[0x00, 0xff, 0x00], 4, 16).unwrap();
        assert_eq!(adjusted, 65512);
        assert_eq!(adjusted, 0xffe8);
    }

    #[test]
    fn test_adjust_gas_exact_boundary() {
        assert_eq!(adjust_gas(24, &[0x00, 0xff, 0x00], 4, 16).unwrap(), 0);
        assert_eq!(adjust_gas(100, &[], 4, 16).unwrap(), 100);
    }

    #[test]
    fn test_adjust_gas_underflow() {
        let err = adjust_gas(23, &[0x00, 0xff, 0x00], 4, 16).unwrap_err();
        match err {
            RelayError::Arithmetic { gas, cost } => {
                assert_eq!(gas, 23);
                assert_eq!(cost, 24);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_gas_constants_fail_instead_of_wrapping() {
        assert_eq!(calldata_cost(&[1, 1], 4, u64::MAX / 2 + 1), None);
        assert_eq!(calldata_cost(&[0, 1], u64::MAX, 1), None);
        assert_eq!(calldata_cost(&[], u64::MAX, u64::MAX), Some(0));

        let err = adjust_gas(100, &[1, 1], 4, u64::MAX / 2 + 1).unwrap_err();
        assert!(matches!(err, RelayError::Arithmetic { gas: 100, cost: u64::MAX }));
    }
}
