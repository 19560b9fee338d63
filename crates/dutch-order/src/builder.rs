//! Fluent builder for Dutch limit orders.

use alloy_primitives::{Address, U256};
use chrono::Utc;
use dutch_types::{
	ChainConfigs, ChainId, DutchInput, DutchLimitOrder, DutchLimitOrderInfo, DutchOutput,
	EncodedValidation, OrderError, ResolvedChain, Result, Timestamp, ValidationInfo,
};
use std::sync::Arc;
use tracing::debug;

/// Validation as handed to the builder: typed, or an already encoded pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationInput {
	Info(ValidationInfo),
	Encoded(EncodedValidation),
}

impl ValidationInput {
	fn encode(&self, chain: &ResolvedChain) -> Result<EncodedValidation> {
		match self {
			Self::Info(info) => info.encode(chain),
			Self::Encoded(encoded) => Ok(encoded.clone()),
		}
	}
}

impl From<ValidationInfo> for ValidationInput {
	fn from(info: ValidationInfo) -> Self {
		Self::Info(info)
	}
}

impl From<EncodedValidation> for ValidationInput {
	fn from(encoded: EncodedValidation) -> Self {
		Self::Encoded(encoded)
	}
}

/// Mutable draft of a Dutch limit order.
///
/// Setters only record values. All cross-field checks run in [`build`],
/// which leaves the draft untouched and may be called any number of times.
/// [`deadline`] is the exception: it rejects timestamps that are not in the
/// future immediately.
///
/// [`build`]: DutchLimitOrderBuilder::build
/// [`deadline`]: DutchLimitOrderBuilder::deadline
#[derive(Debug, Clone)]
pub struct DutchLimitOrderBuilder {
	chain: Arc<ResolvedChain>,
	offerer: Option<Address>,
	nonce: Option<U256>,
	deadline: Option<Timestamp>,
	start_time: Option<Timestamp>,
	end_time: Option<Timestamp>,
	input: Option<DutchInput>,
	outputs: Vec<DutchOutput>,
	validation: Option<ValidationInput>,
}

impl DutchLimitOrderBuilder {
	/// Creates an empty builder for `chain_id`.
	///
	/// Fails if `configs` has no reactor for the chain.
	pub fn new(configs: &ChainConfigs, chain_id: ChainId) -> Result<Self> {
		let chain = configs.resolve(chain_id)?;
		debug!("Created order builder for chain {}", chain_id);
		Ok(Self::with_chain(chain))
	}

	fn with_chain(chain: Arc<ResolvedChain>) -> Self {
		Self {
			chain,
			offerer: None,
			nonce: None,
			deadline: None,
			start_time: None,
			end_time: None,
			input: None,
			outputs: Vec::new(),
			validation: None,
		}
	}

	/// Pre-populates a builder with every field of `order`.
	///
	/// The deadline is copied as-is, so orders whose deadline has passed can
	/// still be rebuilt.
	pub fn from_order(order: &DutchLimitOrder) -> Self {
		let info = order.info();
		let mut builder = Self::with_chain(Arc::clone(order.chain()));

		builder.offerer = Some(info.offerer);
		builder.nonce = Some(info.nonce);
		builder.deadline = Some(info.deadline);
		builder.start_time = Some(info.start_time);
		builder.end_time = Some(info.end_time);
		builder.input = Some(info.input.clone());
		builder.outputs = info.outputs.clone();
		builder.validation = Some(ValidationInput::Encoded(info.validation()));

		builder
	}

	pub fn chain_id(&self) -> ChainId {
		self.chain.chain_id
	}

	pub fn offerer(&mut self, offerer: Address) -> &mut Self {
		self.offerer = Some(offerer);
		self
	}

	pub fn nonce(&mut self, nonce: U256) -> &mut Self {
		self.nonce = Some(nonce);
		self
	}

	/// Sets the deadline, which must be strictly after the current time.
	///
	/// Checked here rather than in `build`, so an order built later from
	/// this draft is never rejected for having aged past its deadline.
	pub fn deadline(&mut self, deadline: Timestamp) -> Result<&mut Self> {
		if deadline <= current_timestamp() {
			return Err(OrderError::Deadline(deadline));
		}
		self.deadline = Some(deadline);
		Ok(self)
	}

	pub fn start_time(&mut self, start_time: Timestamp) -> &mut Self {
		self.start_time = Some(start_time);
		self
	}

	pub fn end_time(&mut self, end_time: Timestamp) -> &mut Self {
		self.end_time = Some(end_time);
		self
	}

	/// Replaces the input.
	pub fn input(&mut self, input: DutchInput) -> &mut Self {
		self.input = Some(input);
		self
	}

	/// Appends an output.
	pub fn output(&mut self, output: DutchOutput) -> &mut Self {
		self.outputs.push(output);
		self
	}

	/// Replaces the validation. Unset means no validation.
	pub fn validation(&mut self, validation: impl Into<ValidationInput>) -> &mut Self {
		self.validation = Some(validation.into());
		self
	}

	/// Validates the draft and returns a new order.
	///
	/// Checks run in this order: required fields, endTime against deadline,
	/// startTime against deadline, input amounts, output amounts, then
	/// validation encoding against the chain and decoding.
	pub fn build(&self) -> Result<DutchLimitOrder> {
		let offerer = self.offerer.ok_or_else(|| OrderError::missing("offerer"))?;
		let nonce = self.nonce.ok_or_else(|| OrderError::missing("nonce"))?;
		let (deadline, end_time) = match (self.deadline, self.end_time) {
			(Some(deadline), Some(end_time)) => (deadline, end_time),
			(Some(deadline), None) => (deadline, deadline),
			(None, Some(end_time)) => (end_time, end_time),
			(None, None) => return Err(OrderError::missing("endTime")),
		};
		let start_time = self
			.start_time
			.ok_or_else(|| OrderError::missing("startTime"))?;
		let input = self
			.input
			.clone()
			.ok_or_else(|| OrderError::missing("input"))?;
		if self.outputs.is_empty() {
			return Err(OrderError::missing("outputs"));
		}

		let mut info = DutchLimitOrderInfo {
			reactor: self.chain.reactor,
			offerer,
			nonce,
			deadline,
			start_time,
			end_time,
			input,
			outputs: self.outputs.clone(),
			validation_contract: Address::ZERO,
			validation_data: Default::default(),
		};
		info.validate()?;

		let validation = match &self.validation {
			Some(validation) => validation.encode(&self.chain)?,
			None => EncodedValidation::none(),
		};
		info.validation_contract = validation.contract;
		info.validation_data = validation.data;

		let order = DutchLimitOrder::new(info, Arc::clone(&self.chain))?;
		debug!(
			"Built order for offerer {} on chain {} with {} output(s)",
			offerer,
			self.chain.chain_id,
			self.outputs.len()
		);
		Ok(order)
	}
}

fn current_timestamp() -> Timestamp {
	u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}
