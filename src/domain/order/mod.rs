//! Order domain — resting orders as read from the CLOB contract.

mod convert;
pub mod wire;

pub use convert::OrderConversionError;

use crate::shared::serde_util::u256_dec;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A resting order on the book. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub owner: Address,
    #[serde(with = "u256_dec")]
    pub price: U256,
    #[serde(with = "u256_dec")]
    pub amount: U256,
    pub is_bid: bool,
}
