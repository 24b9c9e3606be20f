//! External contract collaborators.
//!
//! The CLOB contract and the two token contracts are reached through the
//! [`ClobContract`] and [`TokenContract`] traits. Writes carry the sender
//! explicitly; signing and submission belong to the implementation (the
//! wallet/provider side), and a write resolves once its transaction is
//! confirmed.

pub mod abi;
pub mod events;

#[cfg(feature = "http")]
pub mod rpc;

pub use events::{ContractEvent, LogMeta, OrderMatchedLog, PENDING_EVENT_ID};

use crate::domain::order::wire::OrderBookRows;
use crate::error::ContractError;
use crate::shared::Token;
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;

/// A confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

#[async_trait]
pub trait ClobContract: Send + Sync {
    fn address(&self) -> Address;

    /// `getOrderBook()`: the full book as `(bids, asks)` in one read.
    async fn get_order_book(&self) -> Result<OrderBookRows, ContractError>;

    /// `placeOrder(price, amount, isBid)`.
    async fn place_order(
        &self,
        from: Address,
        price: U256,
        amount: U256,
        is_bid: bool,
    ) -> Result<TxReceipt, ContractError>;
}

#[async_trait]
pub trait TokenContract: Send + Sync {
    fn token(&self) -> Token;

    fn address(&self) -> Address;

    async fn balance_of(&self, owner: Address) -> Result<U256, ContractError>;

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ContractError>;

    async fn approve(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxReceipt, ContractError>;

    async fn mint(&self, from: Address, to: Address, amount: U256)
        -> Result<TxReceipt, ContractError>;
}
