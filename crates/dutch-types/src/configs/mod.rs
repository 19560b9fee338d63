//! # Chain Configuration
//!
//! Per-chain contract addresses needed to build orders: the reactor that
//! settles Dutch limit orders and the validation contracts an order may
//! delegate extra checks to.
//!
//! The table is built once (from the built-in defaults or by the
//! configuration loader) and handed to each builder explicitly. Resolving a
//! chain produces a shared, read-only [`ResolvedChain`].

use crate::{
	chains::ChainId,
	common::Address,
	errors::{OrderError, Result},
	validation::ValidationType,
};
use alloy_primitives::address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Reactor used for Dutch limit orders on mainnet.
pub const MAINNET_REACTOR: Address = address!("0xe80bf394d190851e215d5f67b67f8f5a52783f1e");
/// Exclusive filler validation contract on mainnet.
pub const MAINNET_EXCLUSIVE_FILLER_VALIDATION: Address =
	address!("0x8a66a74e15544db9688b68b06e116f5d19e5df90");
/// Reactor deployed on local mainnet forks.
pub const MAINNET_FORK_REACTOR: Address = address!("0xbd7f9d0239f81c94b728d827a87b9864972661ec");

/// Contract addresses for a single chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainConfig {
	/// Chain name for logging
	#[serde(default)]
	pub name: Option<String>,
	/// Dutch limit order reactor
	pub reactor: Address,
	/// Known validation contracts
	#[serde(default)]
	pub validation_contracts: ValidationContracts,
}

impl ChainConfig {
	pub fn new(reactor: Address) -> Self {
		Self {
			name: None,
			reactor,
			validation_contracts: ValidationContracts::default(),
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_exclusive_filler(mut self, contract: Address) -> Self {
		self.validation_contracts.exclusive_filler = Some(contract);
		self
	}
}

/// Validation contracts known on a chain, one per validation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationContracts {
	/// Contract enforcing exclusive filler rights
	#[serde(default)]
	pub exclusive_filler: Option<Address>,
}

impl ValidationContracts {
	/// Contract responsible for a validation kind, if configured.
	pub fn contract_for(&self, kind: ValidationType) -> Option<Address> {
		match kind {
			ValidationType::None => None,
			ValidationType::ExclusiveFiller => self.exclusive_filler,
		}
	}

	/// Validation kind whose decoder owns payloads for `contract`.
	pub fn kind_of(&self, contract: Address) -> Option<ValidationType> {
		if self.exclusive_filler == Some(contract) {
			return Some(ValidationType::ExclusiveFiller);
		}
		None
	}
}

/// A chain's configuration after resolution, shared between builders and
/// the orders they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChain {
	pub chain_id: ChainId,
	pub reactor: Address,
	pub validation_contracts: ValidationContracts,
}

impl ResolvedChain {
	/// Contract for `kind`, or a configuration error naming this chain.
	pub fn validation_contract(&self, kind: ValidationType) -> Result<Address> {
		self.validation_contracts
			.contract_for(kind)
			.ok_or(OrderError::MissingValidationContract {
				kind,
				chain_id: self.chain_id,
			})
	}
}

/// Read-only table of chain configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfigs {
	chains: HashMap<ChainId, ChainConfig>,
}

impl ChainConfigs {
	pub fn new(chains: HashMap<ChainId, ChainConfig>) -> Self {
		Self { chains }
	}

	/// An empty table; every resolution fails.
	pub fn empty() -> Self {
		Self {
			chains: HashMap::new(),
		}
	}

	pub fn with_chain(mut self, chain_id: impl Into<ChainId>, config: ChainConfig) -> Self {
		self.chains.insert(chain_id.into(), config);
		self
	}

	pub fn get(&self, chain_id: ChainId) -> Option<&ChainConfig> {
		self.chains.get(&chain_id)
	}

	pub fn chains(&self) -> &HashMap<ChainId, ChainConfig> {
		&self.chains
	}

	/// Configured chain ids in ascending order.
	pub fn chain_ids(&self) -> Vec<ChainId> {
		let mut ids: Vec<ChainId> = self.chains.keys().copied().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.chains.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chains.is_empty()
	}

	/// Resolves the contracts for `chain_id`.
	pub fn resolve(&self, chain_id: ChainId) -> Result<Arc<ResolvedChain>> {
		let config = self
			.chains
			.get(&chain_id)
			.ok_or(OrderError::MissingReactor(chain_id))?;

		Ok(Arc::new(ResolvedChain {
			chain_id,
			reactor: config.reactor,
			validation_contracts: config.validation_contracts.clone(),
		}))
	}
}

impl Default for ChainConfigs {
	/// Known deployments.
	fn default() -> Self {
		Self::empty()
			.with_chain(
				ChainId::ETHEREUM,
				ChainConfig::new(MAINNET_REACTOR)
					.with_name("Ethereum")
					.with_exclusive_filler(MAINNET_EXCLUSIVE_FILLER_VALIDATION),
			)
			.with_chain(
				ChainId::MAINNET_FORK,
				ChainConfig::new(MAINNET_FORK_REACTOR)
					.with_name("Mainnet fork")
					.with_exclusive_filler(MAINNET_EXCLUSIVE_FILLER_VALIDATION),
			)
	}
}

impl From<HashMap<ChainId, ChainConfig>> for ChainConfigs {
	fn from(chains: HashMap<ChainId, ChainConfig>) -> Self {
		Self::new(chains)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_chains() {
		let configs = ChainConfigs::default();
		assert_eq!(configs.chain_ids(), vec![ChainId(1), ChainId(12341234)]);

		let mainnet = configs.resolve(ChainId::ETHEREUM).unwrap();
		assert_eq!(mainnet.chain_id, ChainId(1));
		assert_eq!(mainnet.reactor, MAINNET_REACTOR);
		assert_eq!(
			mainnet.validation_contracts.exclusive_filler,
			Some(MAINNET_EXCLUSIVE_FILLER_VALIDATION)
		);
	}

	#[test]
	fn test_unknown_chain() {
		let err = ChainConfigs::default()
			.resolve(ChainId(99999999))
			.unwrap_err();
		assert!(err.is_config());
		assert_eq!(
			err.to_string(),
			"Missing configuration for reactor: 99999999"
		);
	}

	#[test]
	fn test_validation_contract_lookup() {
		let filler_contract = Address::repeat_byte(0x22);
		let contracts = ValidationContracts {
			exclusive_filler: Some(filler_contract),
		};

		assert_eq!(
			contracts.kind_of(filler_contract),
			Some(ValidationType::ExclusiveFiller)
		);
		assert_eq!(contracts.kind_of(Address::repeat_byte(0x33)), None);
		assert_eq!(contracts.contract_for(ValidationType::None), None);
	}

	#[test]
	fn test_missing_validation_contract() {
		let configs =
			ChainConfigs::empty().with_chain(ChainId(5), ChainConfig::new(Address::repeat_byte(1)));
		let chain = configs.resolve(ChainId(5)).unwrap();

		let err = chain
			.validation_contract(ValidationType::ExclusiveFiller)
			.unwrap_err();
		assert_eq!(
			err.to_string(),
			"Missing exclusive filler validation contract for chain: 5"
		);
	}
}
