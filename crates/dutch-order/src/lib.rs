//! Order construction for Dutch limit orders.
//!
//! [`DutchLimitOrderBuilder`] accumulates order fields through fluent setters
//! and checks every invariant in one pass when `build` is called. The one
//! exception is the deadline, which must lie in the future at the moment it
//! is set. Builders can also be regenerated from an existing order to derive
//! a modified copy.

pub mod builder;

pub use builder::{DutchLimitOrderBuilder, ValidationInput};
pub use dutch_types::{
	ChainConfigs, ChainId, DutchInput, DutchLimitOrder, DutchLimitOrderInfo, DutchOutput,
	EncodedValidation, OrderError, Result, ValidationInfo,
};
