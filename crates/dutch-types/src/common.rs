//! Common types used throughout the order system.

use crate::errors::{OrderError, Result};

// Re-export commonly used ethereum types
pub use alloy_primitives::{Address, Bytes, U256};

/// Timestamp (Unix seconds)
pub type Timestamp = u64;

/// Formats an address as lower-case hex with a `0x` prefix.
pub fn format_address(address: &Address) -> String {
	format!("0x{}", hex::encode(address.as_slice()))
}

/// Formats raw bytes as lower-case hex with a `0x` prefix.
pub fn format_bytes(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

/// Parses a hex address, with or without the `0x` prefix.
pub fn parse_address(field: &str, value: &str) -> Result<Address> {
	value
		.parse::<Address>()
		.map_err(|_| OrderError::invalid_field(field, value))
}

/// Parses `0x`-prefixed hex into bytes. `"0x"` yields empty bytes.
pub fn parse_bytes(field: &str, value: &str) -> Result<Bytes> {
	hex::decode(value.trim_start_matches("0x"))
		.map(Bytes::from)
		.map_err(|_| OrderError::invalid_field(field, value))
}

/// Parses a decimal-string unsigned 256-bit integer.
pub fn parse_u256(field: &str, value: &str) -> Result<U256> {
	U256::from_str_radix(value, 10).map_err(|_| OrderError::invalid_field(field, value))
}
