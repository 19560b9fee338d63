//! Core types for Dutch limit orders.
//!
//! This crate holds the value types shared by the builder and the
//! configuration loader: amount pairs, the validation codec, the immutable
//! order model with its canonical JSON and ABI forms, the per-chain contract
//! table, and the error taxonomy.

pub mod amounts;
pub mod chains;
pub mod common;
pub mod configs;
pub mod errors;
pub mod order;
pub mod validation;

pub use amounts::*;
pub use chains::ChainId;
pub use common::*;
pub use configs::*;
pub use errors::{OrderError, Result};
pub use order::*;
pub use validation::*;
