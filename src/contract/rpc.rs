//! Contract collaborators backed by a JSON-RPC node.
//!
//! Writes are sent with `eth_sendTransaction`, so the node (a dev node with
//! unlocked accounts, or a wallet-backed provider) signs for `from`. Each write
//! resolves once its receipt is available.

use super::abi::{IClob, IMintableToken};
use super::{ClobContract, TokenContract, TxReceipt};
use crate::domain::order::wire::{OrderBookRows, OrderRow};
use crate::error::ContractError;
use crate::rpc::{RpcHttp, TransactionRequest};
use crate::shared::Token;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::sync::Arc;

async fn read<C: SolCall>(rpc: &RpcHttp, to: Address, call: C) -> Result<C::Return, ContractError> {
    let out = rpc
        .call(&TransactionRequest::call(to, call.abi_encode()))
        .await?;
    C::abi_decode_returns(&out).map_err(|e| ContractError::Decode(e.to_string()))
}

async fn write<C: SolCall>(
    rpc: &RpcHttp,
    from: Address,
    to: Address,
    call: C,
) -> Result<TxReceipt, ContractError> {
    let tx_hash = rpc
        .send_transaction(&TransactionRequest::send(from, to, call.abi_encode()))
        .await?;
    tracing::debug!("Sent {} as {}", C::SIGNATURE, tx_hash);

    let receipt = rpc.wait_for_receipt(tx_hash).await?;
    if receipt.is_reverted() {
        return Err(ContractError::Reverted {
            tx_hash: tx_hash.to_string(),
        });
    }
    Ok(TxReceipt {
        tx_hash,
        block_number: receipt.block_number,
    })
}

fn order_row(order: IClob::Order) -> OrderRow {
    OrderRow {
        order_id: order.orderId,
        owner: order.owner,
        price: order.price,
        amount: order.amount,
        is_bid: order.isBid,
    }
}

// ─── RpcClob ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RpcClob {
    rpc: Arc<RpcHttp>,
    address: Address,
}

impl RpcClob {
    pub fn new(rpc: Arc<RpcHttp>, address: Address) -> Self {
        Self { rpc, address }
    }
}

#[async_trait]
impl ClobContract for RpcClob {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_order_book(&self) -> Result<OrderBookRows, ContractError> {
        let book = read(&self.rpc, self.address, IClob::getOrderBookCall {}).await?;
        Ok(OrderBookRows {
            bids: book.bids.into_iter().map(order_row).collect(),
            asks: book.asks.into_iter().map(order_row).collect(),
        })
    }

    async fn place_order(
        &self,
        from: Address,
        price: U256,
        amount: U256,
        is_bid: bool,
    ) -> Result<TxReceipt, ContractError> {
        let call = IClob::placeOrderCall {
            price,
            amount,
            isBid: is_bid,
        };
        write(&self.rpc, from, self.address, call).await
    }
}

// ─── RpcToken ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RpcToken {
    rpc: Arc<RpcHttp>,
    token: Token,
    address: Address,
}

impl RpcToken {
    pub fn new(rpc: Arc<RpcHttp>, token: Token, address: Address) -> Self {
        Self {
            rpc,
            token,
            address,
        }
    }
}

#[async_trait]
impl TokenContract for RpcToken {
    fn token(&self) -> Token {
        self.token
    }

    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, ContractError> {
        read(&self.rpc, self.address, IMintableToken::balanceOfCall { owner }).await
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ContractError> {
        let call = IMintableToken::allowanceCall { owner, spender };
        read(&self.rpc, self.address, call).await
    }

    async fn approve(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxReceipt, ContractError> {
        let call = IMintableToken::approveCall { spender, amount };
        write(&self.rpc, from, self.address, call).await
    }

    async fn mint(&self, from: Address, to: Address, amount: U256) -> Result<TxReceipt, ContractError> {
        write(&self.rpc, from, self.address, IMintableToken::mintCall { to, amount }).await
    }
}
