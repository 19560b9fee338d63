//! Dutch limit order model.
//!
//! A [`DutchLimitOrder`] is the immutable result of building: the resolved
//! [`DutchLimitOrderInfo`], its decoded validation, and the chain it was
//! resolved against. It has two external forms:
//!
//! - canonical JSON (`to_json` / `from_json`), the form relays and signing
//!   services exchange. Integers that may exceed 64 bits (nonce, amounts) are
//!   decimal strings, timestamps are numbers, addresses and bytes are
//!   lower-case `0x` hex.
//! - the reactor's ABI encoding (`encode_abi` / `decode_abi`).
//!
//! Every way of constructing an order goes through [`DutchLimitOrder::new`],
//! which enforces the order invariants and decodes validation through the
//! validation codec.

use crate::{
	amounts::{DutchInput, DutchOutput, ResolvedInput, ResolvedOutput},
	chains::ChainId,
	common::*,
	configs::{ChainConfigs, ResolvedChain},
	errors::{OrderError, Result},
	validation::{decode_validation, EncodedValidation, ValidationInfo},
};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

// Solidity type definitions matching the reactor's order struct.
mod abi {
	use alloy_sol_types::sol;

	sol! {
		struct OrderInfo {
			address reactor;
			address offerer;
			uint256 nonce;
			uint256 deadline;
			address validationContract;
			bytes validationData;
		}

		struct DutchInput {
			address token;
			uint256 startAmount;
			uint256 endAmount;
		}

		struct DutchOutput {
			address token;
			uint256 startAmount;
			uint256 endAmount;
			address recipient;
		}

		struct DutchLimitOrder {
			OrderInfo info;
			uint256 startTime;
			uint256 endTime;
			DutchInput input;
			DutchOutput[] outputs;
		}
	}
}

/// Fully resolved order fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutchLimitOrderInfo {
	/// Reactor that settles this order
	pub reactor: Address,
	/// Party whose tokens are swapped
	pub offerer: Address,
	pub nonce: U256,
	pub deadline: Timestamp,
	/// Decay start
	pub start_time: Timestamp,
	/// Decay end
	pub end_time: Timestamp,
	pub input: DutchInput,
	pub outputs: Vec<DutchOutput>,
	pub validation_contract: Address,
	pub validation_data: Bytes,
}

impl DutchLimitOrderInfo {
	pub fn validation(&self) -> EncodedValidation {
		EncodedValidation::new(self.validation_contract, self.validation_data.clone())
	}

	/// Checks the order invariants, first failure wins.
	///
	/// The deadline is not compared against the current time here; that
	/// check belongs to the builder's deadline setter only.
	pub fn validate(&self) -> Result<()> {
		if self.outputs.is_empty() {
			return Err(OrderError::missing("outputs"));
		}

		if self.end_time > self.deadline {
			return Err(OrderError::Invariant(format!(
				"endTime must be before or same as deadline: {}",
				self.end_time
			)));
		}

		if self.start_time > self.deadline {
			return Err(OrderError::Invariant(format!(
				"startTime must be before or same as deadline: {}",
				self.start_time
			)));
		}

		self.input.validate()?;
		for output in &self.outputs {
			output.validate()?;
		}

		Ok(())
	}
}

/// Order amounts at a fixed point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrder {
	pub input: ResolvedInput,
	pub outputs: Vec<ResolvedOutput>,
}

/// An immutable, validated Dutch limit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutchLimitOrder {
	info: DutchLimitOrderInfo,
	validation: ValidationInfo,
	chain: Arc<ResolvedChain>,
}

impl DutchLimitOrder {
	/// Validates `info` against `chain` and decodes its validation.
	pub fn new(info: DutchLimitOrderInfo, chain: Arc<ResolvedChain>) -> Result<Self> {
		if info.reactor != chain.reactor {
			return Err(OrderError::Invariant(format!(
				"reactor {} does not match configured reactor {} for chain {}",
				format_address(&info.reactor),
				format_address(&chain.reactor),
				chain.chain_id
			)));
		}

		info.validate()?;
		let validation = decode_validation(&info.validation(), &chain)?;

		Ok(Self {
			info,
			validation,
			chain,
		})
	}

	pub fn info(&self) -> &DutchLimitOrderInfo {
		&self.info
	}

	pub fn validation(&self) -> &ValidationInfo {
		&self.validation
	}

	pub fn chain_id(&self) -> ChainId {
		self.chain.chain_id
	}

	/// The chain configuration this order was resolved against.
	pub fn chain(&self) -> &Arc<ResolvedChain> {
		&self.chain
	}

	/// Input and output amounts at `timestamp`.
	pub fn resolve(&self, timestamp: Timestamp) -> ResolvedOrder {
		let info = &self.info;
		ResolvedOrder {
			input: ResolvedInput {
				token: info.input.token,
				amount: info
					.input
					.amount_at(info.start_time, info.end_time, timestamp),
			},
			outputs: info
				.outputs
				.iter()
				.map(|output| ResolvedOutput {
					token: output.token,
					amount: output.amount_at(info.start_time, info.end_time, timestamp),
					recipient: output.recipient,
				})
				.collect(),
		}
	}

	/// Canonical JSON form.
	pub fn to_json(&self) -> Value {
		let info = &self.info;
		let outputs: Vec<Value> = info
			.outputs
			.iter()
			.map(|output| {
				json!({
					"token": format_address(&output.token),
					"startAmount": output.start_amount.to_string(),
					"endAmount": output.end_amount.to_string(),
					"recipient": format_address(&output.recipient),
				})
			})
			.collect();

		json!({
			"reactor": format_address(&info.reactor),
			"offerer": format_address(&info.offerer),
			"nonce": info.nonce.to_string(),
			"deadline": info.deadline,
			"startTime": info.start_time,
			"endTime": info.end_time,
			"input": {
				"token": format_address(&info.input.token),
				"startAmount": info.input.start_amount.to_string(),
				"endAmount": info.input.end_amount.to_string(),
			},
			"outputs": outputs,
			"validationContract": format_address(&info.validation_contract),
			"validationData": format_bytes(&info.validation_data),
		})
	}

	/// Parses the canonical JSON form for `chain_id`.
	///
	/// The recorded reactor must match the reactor configured for the chain.
	/// Orders whose deadline has already passed are accepted.
	pub fn from_json(value: &Value, chain_id: ChainId, configs: &ChainConfigs) -> Result<Self> {
		let chain = configs.resolve(chain_id)?;
		let raw = OrderJson::deserialize(value)?;

		let reactor = required(raw.reactor, "reactor")?;
		let offerer = required(raw.offerer, "offerer")?;
		let nonce = required(raw.nonce, "nonce")?;
		let deadline = required(raw.deadline, "deadline")?;
		let start_time = required(raw.start_time, "startTime")?;
		let end_time = required(raw.end_time, "endTime")?;
		let input = required(raw.input, "input")?;
		let outputs = required(raw.outputs.filter(|o| !o.is_empty()), "outputs")?;
		let validation_contract = required(raw.validation_contract, "validationContract")?;
		let validation_data = required(raw.validation_data, "validationData")?;

		let info = DutchLimitOrderInfo {
			reactor: parse_address("reactor", &reactor)?,
			offerer: parse_address("offerer", &offerer)?,
			nonce: parse_u256("nonce", &nonce)?,
			deadline,
			start_time,
			end_time,
			input: input.parse()?,
			outputs: outputs
				.iter()
				.map(OutputJson::parse)
				.collect::<Result<Vec<_>>>()?,
			validation_contract: parse_address("validationContract", &validation_contract)?,
			validation_data: parse_bytes("validationData", &validation_data)?,
		};

		debug!("Parsed order JSON for chain {}", chain_id);
		Self::new(info, chain)
	}

	/// ABI encoding of the reactor's `DutchLimitOrder` struct.
	pub fn encode_abi(&self) -> Bytes {
		let info = &self.info;
		let order = abi::DutchLimitOrder {
			info: abi::OrderInfo {
				reactor: info.reactor,
				offerer: info.offerer,
				nonce: info.nonce,
				deadline: U256::from(info.deadline),
				validationContract: info.validation_contract,
				validationData: info.validation_data.clone(),
			},
			startTime: U256::from(info.start_time),
			endTime: U256::from(info.end_time),
			input: abi::DutchInput {
				token: info.input.token,
				startAmount: info.input.start_amount,
				endAmount: info.input.end_amount,
			},
			outputs: info
				.outputs
				.iter()
				.map(|output| abi::DutchOutput {
					token: output.token,
					startAmount: output.start_amount,
					endAmount: output.end_amount,
					recipient: output.recipient,
				})
				.collect(),
		};

		Bytes::from(order.abi_encode())
	}

	/// Parses the reactor's ABI encoding for `chain_id`.
	pub fn decode_abi(data: &[u8], chain_id: ChainId, configs: &ChainConfigs) -> Result<Self> {
		let chain = configs.resolve(chain_id)?;
		let order = abi::DutchLimitOrder::abi_decode(data)
			.map_err(|e| OrderError::Decode(format!("invalid order encoding: {}", e)))?;

		let info = DutchLimitOrderInfo {
			reactor: order.info.reactor,
			offerer: order.info.offerer,
			nonce: order.info.nonce,
			deadline: timestamp("deadline", order.info.deadline)?,
			start_time: timestamp("startTime", order.startTime)?,
			end_time: timestamp("endTime", order.endTime)?,
			input: DutchInput::new(
				order.input.token,
				order.input.startAmount,
				order.input.endAmount,
			),
			outputs: order
				.outputs
				.into_iter()
				.map(|output| {
					DutchOutput::new(
						output.token,
						output.startAmount,
						output.endAmount,
						output.recipient,
					)
				})
				.collect(),
			validation_contract: order.info.validationContract,
			validation_data: order.info.validationData,
		};

		Self::new(info, chain)
	}
}

impl Serialize for DutchLimitOrder {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.to_json().serialize(serializer)
	}
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
	value.ok_or_else(|| OrderError::missing(field))
}

fn timestamp(field: &str, value: U256) -> Result<Timestamp> {
	u64::try_from(value).map_err(|_| OrderError::invalid_field(field, &value.to_string()))
}

/// JSON shape with every top-level field optional, so that absent fields
/// surface as invariant errors rather than serde errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderJson {
	reactor: Option<String>,
	offerer: Option<String>,
	nonce: Option<String>,
	deadline: Option<u64>,
	start_time: Option<u64>,
	end_time: Option<u64>,
	input: Option<InputJson>,
	outputs: Option<Vec<OutputJson>>,
	validation_contract: Option<String>,
	validation_data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputJson {
	token: Option<String>,
	start_amount: Option<String>,
	end_amount: Option<String>,
}

impl InputJson {
	fn parse(&self) -> Result<DutchInput> {
		let token = required(self.token.as_deref(), "input.token")?;
		let start_amount = required(self.start_amount.as_deref(), "input.startAmount")?;
		let end_amount = required(self.end_amount.as_deref(), "input.endAmount")?;

		Ok(DutchInput::new(
			parse_address("input.token", token)?,
			parse_u256("input.startAmount", start_amount)?,
			parse_u256("input.endAmount", end_amount)?,
		))
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputJson {
	token: Option<String>,
	start_amount: Option<String>,
	end_amount: Option<String>,
	recipient: Option<String>,
}

impl OutputJson {
	fn parse(&self) -> Result<DutchOutput> {
		let token = required(self.token.as_deref(), "outputs.token")?;
		let start_amount = required(self.start_amount.as_deref(), "outputs.startAmount")?;
		let end_amount = required(self.end_amount.as_deref(), "outputs.endAmount")?;
		let recipient = required(self.recipient.as_deref(), "outputs.recipient")?;

		Ok(DutchOutput::new(
			parse_address("outputs.token", token)?,
			parse_u256("outputs.startAmount", start_amount)?,
			parse_u256("outputs.endAmount", end_amount)?,
			parse_address("outputs.recipient", recipient)?,
		))
	}
}
