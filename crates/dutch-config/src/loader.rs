//! Configuration loading from files and environment.

use crate::types::DutchConfig;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use dutch_types::{ChainConfig, ChainId};
use std::path::Path;
use tracing::{debug, info, warn};

/// Overrides a chain's reactor, adding the chain if it is not configured.
const REACTOR_ENV_PREFIX: &str = "DUTCH_REACTOR_";
/// Overrides a configured chain's exclusive filler validation contract.
const EXCLUSIVE_FILLER_ENV_PREFIX: &str = "DUTCH_EXCLUSIVE_FILLER_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Load configuration from file
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DutchConfig> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {:?}", path))?;

		let config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents)?,
			Some("json") => Self::from_json(&contents)?,
			Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
			_ => anyhow::bail!("Unsupported config format: {:?}", path),
		};

		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Load from TOML string
	pub fn from_toml(contents: &str) -> Result<DutchConfig> {
		toml::from_str(contents).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))
	}

	/// Load from JSON string
	pub fn from_json(contents: &str) -> Result<DutchConfig> {
		serde_json::from_str(contents).context("Failed to parse JSON")
	}

	/// Load from YAML string
	pub fn from_yaml(contents: &str) -> Result<DutchConfig> {
		serde_yaml::from_str(contents).context("Failed to parse YAML")
	}

	/// Load from environment variables with optional file override
	pub fn from_env_and_file(file_path: Option<&Path>) -> Result<DutchConfig> {
		let mut config = if let Some(path) = file_path {
			Self::from_file(path)?
		} else {
			debug!("No config file given, starting from built-in chains");
			DutchConfig::default()
		};

		Self::apply_overrides(&mut config, std::env::vars())?;

		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Apply `DUTCH_REACTOR_<chainId>` and `DUTCH_EXCLUSIVE_FILLER_<chainId>`
	/// overrides from `vars`.
	///
	/// Reactors are applied first so a filler override may target a chain
	/// introduced by a reactor override in the same set.
	pub fn apply_overrides<I>(config: &mut DutchConfig, vars: I) -> Result<()>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut reactors = Vec::new();
		let mut fillers = Vec::new();

		for (key, value) in vars {
			if let Some(suffix) = key.strip_prefix(REACTOR_ENV_PREFIX) {
				if let Some(chain_id) = parse_chain_suffix(&key, suffix) {
					reactors.push((chain_id, parse_env_address(&key, &value)?));
				}
			} else if let Some(suffix) = key.strip_prefix(EXCLUSIVE_FILLER_ENV_PREFIX) {
				if let Some(chain_id) = parse_chain_suffix(&key, suffix) {
					fillers.push((chain_id, parse_env_address(&key, &value)?));
				}
			}
		}

		for (chain_id, reactor) in reactors {
			debug!("Overriding reactor for chain {} from environment", chain_id);
			config
				.chains
				.entry(chain_id)
				.and_modify(|chain| chain.reactor = reactor)
				.or_insert_with(|| ChainConfig::new(reactor));
		}

		for (chain_id, contract) in fillers {
			match config.chains.get_mut(&chain_id) {
				Some(chain) => {
					debug!(
						"Overriding exclusive filler validation for chain {} from environment",
						chain_id
					);
					chain.validation_contracts.exclusive_filler = Some(contract);
				}
				None => warn!(
					"Ignoring exclusive filler override for unconfigured chain {}",
					chain_id
				),
			}
		}

		Ok(())
	}

	/// Validate configuration
	pub fn validate_config(config: &DutchConfig) -> Result<()> {
		if config.chains.is_empty() {
			anyhow::bail!("At least one chain must be configured");
		}

		for (chain_id, chain) in &config.chains {
			if chain.reactor.is_zero() {
				anyhow::bail!("Chain {} has a zero reactor address", chain_id);
			}
			if chain.validation_contracts.exclusive_filler == Some(Address::ZERO) {
				anyhow::bail!(
					"Chain {} has a zero exclusive filler validation address",
					chain_id
				);
			}
		}

		Ok(())
	}
}

fn parse_chain_suffix(key: &str, suffix: &str) -> Option<ChainId> {
	match suffix.parse::<ChainId>() {
		Ok(chain_id) => Some(chain_id),
		Err(_) => {
			debug!("Ignoring {}: not a chain id", key);
			None
		}
	}
}

fn parse_env_address(key: &str, value: &str) -> Result<Address> {
	value
		.trim()
		.parse::<Address>()
		.with_context(|| format!("Invalid address in {}: {}", key, value))
}

/// Load configuration from standard locations
pub fn load_config() -> Result<DutchConfig> {
	// Check for config file in order:
	// 1. Environment variable CONFIG_FILE
	// 2. ./config.toml
	// 3. ./config/chains.toml
	// 4. Built-in chains with env overrides

	if let Ok(path) = std::env::var("CONFIG_FILE") {
		return ConfigLoader::from_env_and_file(Some(Path::new(&path)));
	}

	let paths = ["./config.toml", "./config/chains.toml"];

	for path in &paths {
		if Path::new(path).exists() {
			return ConfigLoader::from_env_and_file(Some(Path::new(path)));
		}
	}

	ConfigLoader::from_env_and_file(None)
}

#[cfg(test)]
mod tests {
	use super::*;
	use dutch_types::{MAINNET_EXCLUSIVE_FILLER_VALIDATION, MAINNET_REACTOR};
	use std::io::Write;

	const TOML: &str = r#"
[chains.1]
name = "Ethereum"
reactor = "0xe80bf394d190851e215d5f67b67f8f5a52783f1e"

[chains.1.validation_contracts]
exclusive_filler = "0x8a66a74e15544db9688b68b06e116f5d19e5df90"

[chains.5]
reactor = "0x1111111111111111111111111111111111111111"
"#;

	fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		file
	}

	fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_toml_parsing() {
		let config = ConfigLoader::from_toml(TOML).unwrap();
		assert_eq!(config.chains.len(), 2);

		let mainnet = config.chains.get(&ChainId(1)).unwrap();
		assert_eq!(mainnet.name.as_deref(), Some("Ethereum"));
		assert_eq!(mainnet.reactor, MAINNET_REACTOR);
		assert_eq!(
			mainnet.validation_contracts.exclusive_filler,
			Some(MAINNET_EXCLUSIVE_FILLER_VALIDATION)
		);

		let other = config.chains.get(&ChainId(5)).unwrap();
		assert_eq!(other.name, None);
		assert_eq!(other.validation_contracts.exclusive_filler, None);
	}

	#[test]
	fn test_json_parsing() {
		let json = r#"{
            "chains": {
                "1": {
                    "reactor": "0xe80bf394d190851e215d5f67b67f8f5a52783f1e",
                    "validation_contracts": {
                        "exclusive_filler": "0x8a66a74e15544db9688b68b06e116f5d19e5df90"
                    }
                }
            }
        }"#;

		let config = ConfigLoader::from_json(json).unwrap();
		assert_eq!(config.chains.get(&ChainId(1)).unwrap().reactor, MAINNET_REACTOR);
	}

	#[test]
	fn test_yaml_parsing() {
		let yaml = r#"
chains:
  "12341234":
    name: Mainnet fork
    reactor: "0xbd7f9d0239f81c94b728d827a87b9864972661ec"
"#;

		let config = ConfigLoader::from_yaml(yaml).unwrap();
		let fork = config.chains.get(&ChainId::MAINNET_FORK).unwrap();
		assert_eq!(fork.name.as_deref(), Some("Mainnet fork"));
	}

	#[test]
	fn test_toml_round_trip() {
		let config = ConfigLoader::from_toml(TOML).unwrap();
		let serialized = toml::to_string(&config).unwrap();
		let reparsed = ConfigLoader::from_toml(&serialized).unwrap();
		assert_eq!(reparsed, config);
	}

	#[test]
	fn test_from_file_dispatches_on_extension() {
		let file = write_config(".toml", TOML);
		let config = ConfigLoader::from_file(file.path()).unwrap();
		assert_eq!(config.chains.len(), 2);

		let json = serde_json::to_string(&config).unwrap();
		let file = write_config(".json", &json);
		assert_eq!(ConfigLoader::from_file(file.path()).unwrap(), config);
	}

	#[test]
	fn test_from_file_unsupported_format() {
		let file = write_config(".ini", TOML);
		let err = ConfigLoader::from_file(file.path()).unwrap_err();
		assert!(err.to_string().contains("Unsupported config format"));
	}

	#[test]
	fn test_from_file_missing() {
		let dir = tempfile::tempdir().unwrap();
		let err = ConfigLoader::from_file(dir.path().join("absent.toml")).unwrap_err();
		assert!(err.to_string().contains("Failed to read config file"));
	}

	#[test]
	fn test_from_file_runs_validation() {
		let file = write_config(
			".toml",
			r#"
[chains.1]
reactor = "0x0000000000000000000000000000000000000000"
"#,
		);
		let err = ConfigLoader::from_file(file.path()).unwrap_err();
		assert!(err.to_string().contains("zero reactor address"));
	}

	#[test]
	fn test_validation_requires_a_chain() {
		let config = ConfigLoader::from_toml("[chains]\n").unwrap();
		let err = ConfigLoader::validate_config(&config).unwrap_err();
		assert_eq!(err.to_string(), "At least one chain must be configured");
	}

	#[test]
	fn test_validation_rejects_zero_exclusive_filler() {
		let mut config = DutchConfig::default();
		config
			.chains
			.get_mut(&ChainId(1))
			.unwrap()
			.validation_contracts
			.exclusive_filler = Some(Address::ZERO);

		assert!(ConfigLoader::validate_config(&config).is_err());
	}

	#[test]
	fn test_default_config_is_valid() {
		assert!(ConfigLoader::validate_config(&DutchConfig::default()).is_ok());
	}

	#[test]
	fn test_reactor_override() {
		let mut config = DutchConfig::default();
		ConfigLoader::apply_overrides(
			&mut config,
			vars(&[
				("DUTCH_REACTOR_1", "0x2222222222222222222222222222222222222222"),
				("UNRELATED", "value"),
			]),
		)
		.unwrap();

		let mainnet = config.chains.get(&ChainId(1)).unwrap();
		assert_eq!(mainnet.reactor, Address::repeat_byte(0x22));
		// other settings survive
		assert_eq!(
			mainnet.validation_contracts.exclusive_filler,
			Some(MAINNET_EXCLUSIVE_FILLER_VALIDATION)
		);
	}

	#[test]
	fn test_reactor_override_adds_chain() {
		let mut config = DutchConfig::default();
		ConfigLoader::apply_overrides(
			&mut config,
			vars(&[
				("DUTCH_EXCLUSIVE_FILLER_10", "0x3333333333333333333333333333333333333333"),
				("DUTCH_REACTOR_10", "0x2222222222222222222222222222222222222222"),
			]),
		)
		.unwrap();

		let chain = config.chains.get(&ChainId(10)).unwrap();
		assert_eq!(chain.reactor, Address::repeat_byte(0x22));
		assert_eq!(
			chain.validation_contracts.exclusive_filler,
			Some(Address::repeat_byte(0x33))
		);
		assert!(config.chain_configs().resolve(ChainId(10)).is_ok());
	}

	#[test]
	fn test_exclusive_filler_override_for_unknown_chain_is_ignored() {
		let mut config = DutchConfig::default();
		ConfigLoader::apply_overrides(
			&mut config,
			vars(&[(
				"DUTCH_EXCLUSIVE_FILLER_10",
				"0x3333333333333333333333333333333333333333",
			)]),
		)
		.unwrap();

		assert!(!config.chains.contains_key(&ChainId(10)));
	}

	#[test]
	fn test_invalid_override_address() {
		let mut config = DutchConfig::default();
		let err = ConfigLoader::apply_overrides(
			&mut config,
			vars(&[("DUTCH_REACTOR_1", "not-an-address")]),
		)
		.unwrap_err();

		assert!(err.to_string().contains("Invalid address in DUTCH_REACTOR_1"));
	}

	#[test]
	fn test_non_numeric_override_suffix_is_ignored() {
		let mut config = DutchConfig::default();
		ConfigLoader::apply_overrides(
			&mut config,
			vars(&[("DUTCH_REACTOR_MAINNET", "0x2222222222222222222222222222222222222222")]),
		)
		.unwrap();

		assert_eq!(config, DutchConfig::default());
	}
}
