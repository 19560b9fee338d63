//! Error types for order construction and decoding.

use crate::{chains::ChainId, common::U256, validation::ValidationType};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrderError>;

/// Which side of the order an amount pair belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
	Input,
	Output,
}

impl AmountKind {
	/// Relation the start amount must hold against the end amount.
	pub fn relation(&self) -> &'static str {
		match self {
			Self::Input => "less than or equal to",
			Self::Output => "greater than",
		}
	}
}

impl fmt::Display for AmountKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Input => write!(f, "input"),
			Self::Output => write!(f, "output"),
		}
	}
}

#[derive(Error, Debug)]
pub enum OrderError {
	/// The requested chain has no reactor configured.
	#[error("Missing configuration for reactor: {0}")]
	MissingReactor(ChainId),

	/// The chain has no contract for a validation kind that was requested.
	#[error("Missing {kind} validation contract for chain: {chain_id}")]
	MissingValidationContract {
		kind: ValidationType,
		chain_id: ChainId,
	},

	/// Raised by the deadline setter, never by `build`.
	#[error("Deadline must be in the future: {0}")]
	Deadline(u64),

	#[error("Invariant failed: {0}")]
	Invariant(String),

	#[error("startAmount must be {} endAmount: {start_amount}", .kind.relation())]
	InvalidAmount {
		kind: AmountKind,
		start_amount: U256,
		end_amount: U256,
	},

	#[error("Decode error: {0}")]
	Decode(String),

	#[error("Invalid value for field '{field}': {value}")]
	InvalidField { field: String, value: String },

	#[error("Invalid order JSON: {0}")]
	Json(#[from] serde_json::Error),
}

impl OrderError {
	/// Invariant error for a required field that was never supplied.
	pub fn missing(field: &str) -> Self {
		Self::Invariant(format!("{} not set", field))
	}

	pub fn invalid_field(field: &str, value: &str) -> Self {
		Self::InvalidField {
			field: field.to_string(),
			value: value.to_string(),
		}
	}

	/// True for errors caused by the chain configuration table.
	pub fn is_config(&self) -> bool {
		matches!(
			self,
			Self::MissingReactor(_) | Self::MissingValidationContract { .. }
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_messages() {
		assert_eq!(
			OrderError::MissingReactor(ChainId(99999999)).to_string(),
			"Missing configuration for reactor: 99999999"
		);
		assert_eq!(
			OrderError::missing("offerer").to_string(),
			"Invariant failed: offerer not set"
		);
		assert_eq!(
			OrderError::Deadline(1234).to_string(),
			"Deadline must be in the future: 1234"
		);
	}

	#[test]
	fn test_invalid_amount_message_names_start_amount() {
		let output = OrderError::InvalidAmount {
			kind: AmountKind::Output,
			start_amount: U256::from(100),
			end_amount: U256::from(110),
		};
		assert_eq!(
			output.to_string(),
			"startAmount must be greater than endAmount: 100"
		);

		let input = OrderError::InvalidAmount {
			kind: AmountKind::Input,
			start_amount: U256::from(7),
			end_amount: U256::from(5),
		};
		assert_eq!(
			input.to_string(),
			"startAmount must be less than or equal to endAmount: 7"
		);
	}

	#[test]
	fn test_config_classification() {
		assert!(OrderError::MissingReactor(ChainId(5)).is_config());
		assert!(OrderError::MissingValidationContract {
			kind: ValidationType::ExclusiveFiller,
			chain_id: ChainId(5),
		}
		.is_config());
		assert!(!OrderError::Deadline(1).is_config());
	}
}
