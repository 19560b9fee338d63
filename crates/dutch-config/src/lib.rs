//! Chain configuration loading for Dutch limit order builders.
//!
//! Reads reactor and validation contract addresses from TOML, JSON or YAML
//! files, applies environment overrides and turns the result into the
//! [`ChainConfigs`] table the builders resolve against.

pub mod loader;
pub mod serde_helpers;
pub mod types;

pub use dutch_types::ChainConfigs;
pub use loader::{load_config, ConfigLoader};
pub use types::DutchConfig;
