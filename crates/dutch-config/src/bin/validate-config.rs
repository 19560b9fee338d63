//! Configuration validation utility
//!
//! Usage: cargo run --bin validate-config config/chains.toml

use std::env;
use std::process;

use dutch_config::ConfigLoader;
use tracing_subscriber::prelude::*;

fn main() {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let args: Vec<String> = env::args().collect();

	if args.len() != 2 {
		eprintln!("Usage: {} <config-file>", args[0]);
		process::exit(1);
	}

	let config_path = &args[1];

	println!("Validating configuration file: {}", config_path);

	match ConfigLoader::from_file(config_path) {
		Ok(config) => {
			println!("✅ Configuration is valid!");
			println!("Chains configured: {}", config.chains.len());

			let configs = config.chain_configs();
			for chain_id in configs.chain_ids() {
				let Some(chain) = configs.get(chain_id) else {
					continue;
				};
				println!(
					"  {} ({}): reactor {}, exclusive filler {}",
					chain_id,
					chain.name.as_deref().unwrap_or("unnamed"),
					chain.reactor,
					chain
						.validation_contracts
						.exclusive_filler
						.map(|a| a.to_string())
						.unwrap_or_else(|| "none".to_string())
				);
			}
		}
		Err(e) => {
			eprintln!("❌ Configuration validation failed:");
			eprintln!("{:#}", e);
			process::exit(1);
		}
	}
}
