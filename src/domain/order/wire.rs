//! Wire types for `getOrderBook()` results, as returned by the contract.

use crate::shared::serde_util::u256_dec;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// One raw row of the contract's order arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    #[serde(with = "u256_dec")]
    pub order_id: U256,
    pub owner: Address,
    #[serde(with = "u256_dec")]
    pub price: U256,
    #[serde(with = "u256_dec")]
    pub amount: U256,
    pub is_bid: bool,
}

/// A single point-in-time read of the full book, already split by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookRows {
    pub bids: Vec<OrderRow>,
    pub asks: Vec<OrderRow>,
}
