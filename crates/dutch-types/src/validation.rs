//! Validation extensions attached to an order.
//!
//! An order carries its extra validation as an opaque
//! `(validationContract, validationData)` pair. The contract address decides
//! which decoder owns the bytes, so new kinds can be added without touching
//! the order schema. Pairs for contracts this chain does not know about are
//! kept as [`ValidationInfo::Unknown`] rather than rejected.

use crate::{
	common::{Address, Bytes, Timestamp, U256},
	configs::ResolvedChain,
	errors::{OrderError, Result},
};
use alloy_sol_types::{sol, SolValue};
use std::fmt;
use tracing::debug;

sol! {
	/// Payload understood by the exclusive filler validation contract.
	struct ExclusiveFillerValidation {
		uint8 validationType;
		address filler;
		uint256 lastExclusiveTimestamp;
	}
}

/// Size of an ABI-encoded `ExclusiveFillerValidation`.
const EXCLUSIVE_FILLER_PAYLOAD_LEN: usize = 96;

/// Supported validation kinds and their wire discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationType {
	None = 0,
	ExclusiveFiller = 1,
}

impl ValidationType {
	pub fn discriminant(&self) -> u8 {
		*self as u8
	}
}

impl fmt::Display for ValidationType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => write!(f, "none"),
			Self::ExclusiveFiller => write!(f, "exclusive filler"),
		}
	}
}

/// Exclusive fill rights: only `filler` may fill until
/// `last_exclusive_timestamp` (inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveFillerData {
	pub filler: Address,
	pub last_exclusive_timestamp: Timestamp,
}

/// The opaque form stored in an order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedValidation {
	pub contract: Address,
	pub data: Bytes,
}

impl EncodedValidation {
	pub fn new(contract: Address, data: Bytes) -> Self {
		Self { contract, data }
	}

	/// The sentinel for "no validation": zero address and empty bytes.
	pub fn none() -> Self {
		Self::default()
	}

	pub fn is_none(&self) -> bool {
		self.contract.is_zero() && self.data.is_empty()
	}
}

/// Decoded validation of an order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationInfo {
	#[default]
	None,
	ExclusiveFiller(ExclusiveFillerData),
	/// Validation owned by a contract this chain has no decoder for.
	Unknown(EncodedValidation),
}

impl ValidationInfo {
	pub fn exclusive_filler(filler: Address, last_exclusive_timestamp: Timestamp) -> Self {
		Self::ExclusiveFiller(ExclusiveFillerData {
			filler,
			last_exclusive_timestamp,
		})
	}

	pub fn validation_type(&self) -> Option<ValidationType> {
		match self {
			Self::None => Some(ValidationType::None),
			Self::ExclusiveFiller(_) => Some(ValidationType::ExclusiveFiller),
			Self::Unknown(_) => None,
		}
	}

	/// Encodes against the contracts configured for `chain`.
	pub fn encode(&self, chain: &ResolvedChain) -> Result<EncodedValidation> {
		match self {
			Self::None => Ok(EncodedValidation::none()),
			Self::ExclusiveFiller(data) => {
				let contract = chain.validation_contract(ValidationType::ExclusiveFiller)?;
				Ok(encode_exclusive_filler_data(
					data.filler,
					data.last_exclusive_timestamp,
					contract,
				))
			}
			Self::Unknown(encoded) => Ok(encoded.clone()),
		}
	}
}

/// Packs exclusive filler rights for `contract`.
pub fn encode_exclusive_filler_data(
	filler: Address,
	last_exclusive_timestamp: Timestamp,
	contract: Address,
) -> EncodedValidation {
	let payload = ExclusiveFillerValidation {
		validationType: ValidationType::ExclusiveFiller.discriminant(),
		filler,
		lastExclusiveTimestamp: U256::from(last_exclusive_timestamp),
	};

	EncodedValidation::new(contract, Bytes::from(payload.abi_encode()))
}

/// Decodes an order's validation pair using the decoders known on `chain`.
pub fn decode_validation(
	encoded: &EncodedValidation,
	chain: &ResolvedChain,
) -> Result<ValidationInfo> {
	if encoded.is_none() {
		return Ok(ValidationInfo::None);
	}

	match chain.validation_contracts.kind_of(encoded.contract) {
		Some(ValidationType::ExclusiveFiller) => {
			decode_exclusive_filler_data(encoded).map(ValidationInfo::ExclusiveFiller)
		}
		_ => {
			debug!(
				"Keeping validation for unrecognised contract {} on chain {} as opaque",
				encoded.contract, chain.chain_id
			);
			Ok(ValidationInfo::Unknown(encoded.clone()))
		}
	}
}

/// Decodes an exclusive filler payload regardless of the owning contract.
pub fn decode_exclusive_filler_data(encoded: &EncodedValidation) -> Result<ExclusiveFillerData> {
	let malformed = |reason: String| {
		OrderError::Decode(format!(
			"malformed exclusive filler data for {}: {}",
			encoded.contract, reason
		))
	};

	if encoded.data.len() != EXCLUSIVE_FILLER_PAYLOAD_LEN {
		return Err(malformed(format!(
			"expected {} bytes, got {}",
			EXCLUSIVE_FILLER_PAYLOAD_LEN,
			encoded.data.len()
		)));
	}

	let payload = ExclusiveFillerValidation::abi_decode(&encoded.data)
		.map_err(|e| malformed(e.to_string()))?;

	if payload.validationType != ValidationType::ExclusiveFiller.discriminant() {
		return Err(malformed(format!(
			"unexpected validation type {}",
			payload.validationType
		)));
	}

	let last_exclusive_timestamp = u64::try_from(payload.lastExclusiveTimestamp)
		.map_err(|_| malformed("lastExclusiveTimestamp out of range".to_string()))?;

	Ok(ExclusiveFillerData {
		filler: payload.filler,
		last_exclusive_timestamp,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{chains::ChainId, configs::ValidationContracts};

	fn chain() -> ResolvedChain {
		ResolvedChain {
			chain_id: ChainId(1),
			reactor: Address::repeat_byte(0x01),
			validation_contracts: ValidationContracts {
				exclusive_filler: Some(Address::repeat_byte(0x22)),
			},
		}
	}

	#[test]
	fn test_zero_sentinel() {
		let encoded = ValidationInfo::None.encode(&chain()).unwrap();
		assert!(encoded.is_none());
		assert_eq!(encoded.contract, Address::ZERO);
		assert!(encoded.data.is_empty());

		assert_eq!(
			decode_validation(&encoded, &chain()).unwrap(),
			ValidationInfo::None
		);
	}

	#[test]
	fn test_exclusive_filler_payload_layout() {
		let filler = Address::repeat_byte(0x11);
		let encoded =
			encode_exclusive_filler_data(filler, 1_700_000_000, Address::repeat_byte(0x22));

		assert_eq!(encoded.contract, Address::repeat_byte(0x22));
		assert_eq!(encoded.data.len(), 96);
		// discriminant word
		assert_eq!(encoded.data[31], 1);
		assert!(encoded.data[..31].iter().all(|&b| b == 0));
		// filler word, left padded
		assert_eq!(&encoded.data[44..64], filler.as_slice());
		// timestamp word
		assert_eq!(
			U256::from_be_slice(&encoded.data[64..96]),
			U256::from(1_700_000_000u64)
		);
	}

	#[test]
	fn test_exclusive_filler_uses_configured_contract() {
		let info = ValidationInfo::exclusive_filler(Address::repeat_byte(0x11), 1234);
		let encoded = info.encode(&chain()).unwrap();
		assert_eq!(encoded.contract, Address::repeat_byte(0x22));

		assert_eq!(decode_validation(&encoded, &chain()).unwrap(), info);
	}

	#[test]
	fn test_exclusive_filler_without_configured_contract() {
		let mut chain = chain();
		chain.validation_contracts.exclusive_filler = None;

		let err = ValidationInfo::exclusive_filler(Address::repeat_byte(0x11), 1234)
			.encode(&chain)
			.unwrap_err();
		assert!(err.is_config());
	}

	#[test]
	fn test_malformed_bytes_for_known_contract() {
		let encoded = EncodedValidation::new(
			Address::repeat_byte(0x22),
			Bytes::from(vec![1u8, 2, 3]),
		);
		let err = decode_validation(&encoded, &chain()).unwrap_err();
		assert!(matches!(err, OrderError::Decode(_)));
		assert!(err.to_string().contains("expected 96 bytes, got 3"));
	}

	#[test]
	fn test_wrong_discriminant_for_known_contract() {
		let mut encoded = encode_exclusive_filler_data(
			Address::repeat_byte(0x11),
			1234,
			Address::repeat_byte(0x22),
		);
		let mut data = encoded.data.to_vec();
		data[31] = 7;
		encoded.data = Bytes::from(data);

		let err = decode_validation(&encoded, &chain()).unwrap_err();
		assert!(err.to_string().contains("unexpected validation type 7"));
	}

	#[test]
	fn test_unknown_contract_passes_through() {
		let encoded = encode_exclusive_filler_data(
			Address::repeat_byte(0x11),
			1234,
			Address::repeat_byte(0x99),
		);
		let decoded = decode_validation(&encoded, &chain()).unwrap();
		assert_eq!(decoded, ValidationInfo::Unknown(encoded.clone()));
		assert_eq!(decoded.validation_type(), None);

		// opaque data re-encodes unchanged
		assert_eq!(decoded.encode(&chain()).unwrap(), encoded);
	}

	#[test]
	fn test_unknown_contract_with_arbitrary_bytes() {
		let encoded = EncodedValidation::new(
			Address::repeat_byte(0x99),
			Bytes::from(vec![0xde, 0xad]),
		);
		assert!(matches!(
			decode_validation(&encoded, &chain()).unwrap(),
			ValidationInfo::Unknown(_)
		));
	}
}
