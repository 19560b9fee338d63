//! Start/end amount pairs for order inputs and outputs.
//!
//! An input's amount rises over the auction window (the swapper pays more the
//! longer the order sits), an output's amount falls. Both decay linearly
//! between the order's start and end time.

use crate::{
	common::{Address, Timestamp, U256},
	errors::{AmountKind, OrderError, Result},
};
use alloy_primitives::U512;

/// Token the swapper provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutchInput {
	pub token: Address,
	pub start_amount: U256,
	pub end_amount: U256,
}

/// Token the recipient receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutchOutput {
	pub token: Address,
	pub start_amount: U256,
	pub end_amount: U256,
	pub recipient: Address,
}

impl DutchInput {
	pub fn new(token: Address, start_amount: U256, end_amount: U256) -> Self {
		Self {
			token,
			start_amount,
			end_amount,
		}
	}

	/// Input amounts may only rise: `start_amount <= end_amount`.
	pub fn validate(&self) -> Result<()> {
		if self.start_amount > self.end_amount {
			return Err(OrderError::InvalidAmount {
				kind: AmountKind::Input,
				start_amount: self.start_amount,
				end_amount: self.end_amount,
			});
		}
		Ok(())
	}

	pub fn amount_at(&self, start_time: Timestamp, end_time: Timestamp, now: Timestamp) -> U256 {
		decay(
			self.start_amount,
			self.end_amount,
			start_time,
			end_time,
			now,
		)
	}
}

impl DutchOutput {
	pub fn new(token: Address, start_amount: U256, end_amount: U256, recipient: Address) -> Self {
		Self {
			token,
			start_amount,
			end_amount,
			recipient,
		}
	}

	/// Output amounts may only fall: `start_amount >= end_amount`.
	pub fn validate(&self) -> Result<()> {
		if self.start_amount < self.end_amount {
			return Err(OrderError::InvalidAmount {
				kind: AmountKind::Output,
				start_amount: self.start_amount,
				end_amount: self.end_amount,
			});
		}
		Ok(())
	}

	pub fn amount_at(&self, start_time: Timestamp, end_time: Timestamp, now: Timestamp) -> U256 {
		decay(
			self.start_amount,
			self.end_amount,
			start_time,
			end_time,
			now,
		)
	}
}

/// Input amount at a fixed point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
	pub token: Address,
	pub amount: U256,
}

/// Output amount at a fixed point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
	pub token: Address,
	pub amount: U256,
	pub recipient: Address,
}

/// Linear decay between `start_amount` and `end_amount`.
///
/// Falling amounts round down and rising amounts round up, so rounding always
/// favours the filler by at most one unit.
pub fn decay(
	start_amount: U256,
	end_amount: U256,
	start_time: Timestamp,
	end_time: Timestamp,
	now: Timestamp,
) -> U256 {
	if end_time <= now {
		return end_amount;
	}
	if start_time >= now {
		return start_amount;
	}

	// start_time < now < end_time here, so duration is non-zero
	let elapsed = U256::from(now - start_time);
	let duration = U256::from(end_time - start_time);

	if end_amount < start_amount {
		let delta = start_amount - end_amount;
		start_amount - scale(delta, elapsed, duration, false)
	} else {
		let delta = end_amount - start_amount;
		start_amount + scale(delta, elapsed, duration, true)
	}
}

/// `delta * elapsed / duration` over a 512-bit product, with
/// `elapsed < duration`.
fn scale(delta: U256, elapsed: U256, duration: U256, round_up: bool) -> U256 {
	let product = U512::from(delta) * U512::from(elapsed);
	let duration = U512::from(duration);

	let mut quotient = product / duration;
	if round_up && product % duration != U512::ZERO {
		quotient += U512::from(1);
	}

	// quotient <= delta since elapsed < duration
	U256::saturating_from(quotient)
}
