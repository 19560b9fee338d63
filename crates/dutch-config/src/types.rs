//! Configuration file schema.

use crate::serde_helpers::{deserialize_chain_id_map, serialize_chain_id_map};
use dutch_types::{ChainConfig, ChainConfigs, ChainId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level configuration file contents
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DutchConfig {
	/// Chain configurations keyed by chain id
	#[serde(
		deserialize_with = "deserialize_chain_id_map",
		serialize_with = "serialize_chain_id_map"
	)]
	pub chains: HashMap<ChainId, ChainConfig>,
}

impl DutchConfig {
	/// Lookup table for order builders.
	pub fn chain_configs(&self) -> ChainConfigs {
		ChainConfigs::new(self.chains.clone())
	}
}

impl Default for DutchConfig {
	/// Built-in deployments.
	fn default() -> Self {
		Self {
			chains: ChainConfigs::default().chains().clone(),
		}
	}
}

impl From<DutchConfig> for ChainConfigs {
	fn from(config: DutchConfig) -> Self {
		ChainConfigs::new(config.chains)
	}
}
