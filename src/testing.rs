//! In-memory contract collaborators.
//!
//! [`MockChain`] stands in for a local dev node running the CLOB and both
//! token contracts. It rests orders without matching them; matches are
//! injected with [`MockChain::emit_match`]. Every confirmed write publishes a
//! log batch to the chain's [`EventHub`], like the log poller would.
//!
//! ```rust,ignore
//! let chain = MockChain::new();
//! let client = ClobClient::builder()
//!     .clob(chain.clob())
//!     .token(chain.token(Token::Btc))
//!     .token(chain.token(Token::Usdc))
//!     .event_hub(chain.hub())
//!     .build()?;
//! ```

use crate::contract::{ClobContract, ContractEvent, LogMeta, OrderMatchedLog, TokenContract, TxReceipt};
use crate::domain::order::wire::{OrderBookRows, OrderRow};
use crate::error::{ContractError, RpcError};
use crate::events::EventHub;
use crate::shared::Token;
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

#[derive(Debug, Default)]
struct Ledger {
    block: u64,
    tx_count: u64,
    next_order_id: u64,
    bids: Vec<OrderRow>,
    asks: Vec<OrderRow>,
    balances: HashMap<(Token, Address), U256>,
    allowances: HashMap<(Token, Address, Address), U256>,
    order_book_reads: u64,
    placed: Vec<(Address, U256, U256, bool)>,
}

impl Ledger {
    /// Mine one transaction; returns its hash and block.
    fn mine(&mut self) -> (B256, u64) {
        self.block += 1;
        self.tx_count += 1;
        (B256::from(U256::from(self.tx_count)), self.block)
    }
}

pub struct MockChain {
    ledger: Mutex<Ledger>,
    hub: Arc<EventHub>,
    clob_address: Address,
    btc_address: Address,
    usdc_address: Address,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes_held: watch::Sender<bool>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        let (writes_held, _) = watch::channel(false);
        Arc::new(Self {
            ledger: Mutex::new(Ledger {
                next_order_id: 1,
                ..Ledger::default()
            }),
            hub: Arc::new(EventHub::new()),
            clob_address: Address::repeat_byte(0xc1),
            btc_address: Address::repeat_byte(0xb7),
            usdc_address: Address::repeat_byte(0x05),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes_held,
        })
    }

    pub fn hub(&self) -> Arc<EventHub> {
        Arc::clone(&self.hub)
    }

    pub fn clob_address(&self) -> Address {
        self.clob_address
    }

    pub fn token_address(&self, token: Token) -> Address {
        match token {
            Token::Btc => self.btc_address,
            Token::Usdc => self.usdc_address,
        }
    }

    pub fn clob(self: &Arc<Self>) -> Arc<MockClob> {
        Arc::new(MockClob {
            chain: Arc::clone(self),
        })
    }

    pub fn token(self: &Arc<Self>, token: Token) -> Arc<MockToken> {
        Arc::new(MockToken {
            chain: Arc::clone(self),
            token,
        })
    }

    // ─── Seeding & inspection ────────────────────────────────────────────────

    /// Rest an order without emitting any event. Returns its id.
    pub fn seed_order(&self, owner: Address, price: U256, amount: U256, is_bid: bool) -> u64 {
        let mut ledger = self.ledger();
        Self::rest_order(&mut ledger, owner, price, amount, is_bid)
    }

    /// Rest a raw row as-is (for malformed-row scenarios).
    pub fn seed_row(&self, row: OrderRow) {
        let mut ledger = self.ledger();
        if row.is_bid {
            ledger.bids.push(row);
        } else {
            ledger.asks.push(row);
        }
    }

    pub fn set_balance(&self, token: Token, owner: Address, amount: U256) {
        self.ledger().balances.insert((token, owner), amount);
    }

    pub fn set_allowance(&self, token: Token, owner: Address, spender: Address, amount: U256) {
        self.ledger()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn balance(&self, token: Token, owner: Address) -> U256 {
        self.ledger()
            .balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn allowance(&self, token: Token, owner: Address, spender: Address) -> U256 {
        self.ledger()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn order_book_reads(&self) -> u64 {
        self.ledger().order_book_reads
    }

    /// Every `placeOrder` accepted so far: `(from, price, amount, is_bid)`.
    pub fn placed_orders(&self) -> Vec<(Address, U256, U256, bool)> {
        self.ledger().placed.clone()
    }

    pub fn block_number(&self) -> u64 {
        self.ledger().block
    }

    // ─── Failure injection ───────────────────────────────────────────────────

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// While held, writes stay pending (unconfirmed) until released.
    pub fn hold_writes(&self, held: bool) {
        self.writes_held.send_replace(held);
    }

    // ─── Events ──────────────────────────────────────────────────────────────

    /// Mine an `OrderMatched` log on the CLOB and publish it.
    pub fn emit_match(&self, order_id_1: u64, order_id_2: u64, price: U256, amount: U256) -> ContractEvent {
        let (tx_hash, block) = self.ledger().mine();
        let event = ContractEvent::OrderMatched(OrderMatchedLog {
            meta: LogMeta {
                address: self.clob_address,
                block_number: Some(block),
                transaction_hash: Some(tx_hash),
                log_index: Some(0),
            },
            order_id_1: U256::from(order_id_1),
            order_id_2: U256::from(order_id_2),
            price,
            amount,
        });
        self.hub.publish(std::slice::from_ref(&event));
        event
    }

    /// Mine a generic log on `address` and publish it.
    pub fn emit_activity(&self, address: Address) {
        let (tx_hash, block) = self.ledger().mine();
        self.publish_activity(address, tx_hash, block);
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn rest_order(ledger: &mut Ledger, owner: Address, price: U256, amount: U256, is_bid: bool) -> u64 {
        let order_id = ledger.next_order_id;
        ledger.next_order_id += 1;
        let row = OrderRow {
            order_id: U256::from(order_id),
            owner,
            price,
            amount,
            is_bid,
        };
        if is_bid {
            ledger.bids.push(row);
        } else {
            ledger.asks.push(row);
        }
        order_id
    }

    fn publish_activity(&self, address: Address, tx_hash: B256, block: u64) {
        self.hub.publish(&[ContractEvent::Activity {
            meta: LogMeta {
                address,
                block_number: Some(block),
                transaction_hash: Some(tx_hash),
                log_index: Some(0),
            },
            topic0: None,
        }]);
    }

    fn check_read(&self) -> Result<(), ContractError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected());
        }
        Ok(())
    }

    /// Wait out a hold, then apply the failure flag.
    async fn begin_write(&self) -> Result<(), ContractError> {
        let mut held = self.writes_held.subscribe();
        held.wait_for(|held| !*held)
            .await
            .map_err(|e| ContractError::Other(e.to_string()))?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected());
        }
        Ok(())
    }

    fn confirm(&self, address: Address, tx_hash: B256, block: u64) -> TxReceipt {
        self.publish_activity(address, tx_hash, block);
        TxReceipt {
            tx_hash,
            block_number: Some(block),
        }
    }
}

impl std::fmt::Debug for MockChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockChain")
            .field("clob", &self.clob_address)
            .field("block", &self.block_number())
            .finish()
    }
}

fn injected() -> ContractError {
    ContractError::Rpc(RpcError::JsonRpc {
        code: -32000,
        message: "injected failure".to_string(),
    })
}

// ─── MockClob ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct MockClob {
    chain: Arc<MockChain>,
}

#[async_trait]
impl ClobContract for MockClob {
    fn address(&self) -> Address {
        self.chain.clob_address
    }

    async fn get_order_book(&self) -> Result<OrderBookRows, ContractError> {
        tokio::task::yield_now().await;
        let mut ledger = self.chain.ledger();
        ledger.order_book_reads += 1;
        drop(ledger);
        self.chain.check_read()?;
        let ledger = self.chain.ledger();
        Ok(OrderBookRows {
            bids: ledger.bids.clone(),
            asks: ledger.asks.clone(),
        })
    }

    async fn place_order(
        &self,
        from: Address,
        price: U256,
        amount: U256,
        is_bid: bool,
    ) -> Result<TxReceipt, ContractError> {
        self.chain.begin_write().await?;

        let payment = if is_bid { Token::Btc } else { Token::Usdc };
        let (tx_hash, block) = {
            let mut ledger = self.chain.ledger();
            let allowed = ledger
                .allowances
                .get(&(payment, from, self.chain.clob_address))
                .copied()
                .unwrap_or_default();
            let (tx_hash, block) = ledger.mine();
            if allowed < amount {
                return Err(ContractError::Reverted {
                    tx_hash: tx_hash.to_string(),
                });
            }
            MockChain::rest_order(&mut ledger, from, price, amount, is_bid);
            ledger.placed.push((from, price, amount, is_bid));
            (tx_hash, block)
        };

        Ok(self.chain.confirm(self.chain.clob_address, tx_hash, block))
    }
}

// ─── MockToken ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct MockToken {
    chain: Arc<MockChain>,
    token: Token,
}

#[async_trait]
impl TokenContract for MockToken {
    fn token(&self) -> Token {
        self.token
    }

    fn address(&self) -> Address {
        self.chain.token_address(self.token)
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, ContractError> {
        self.chain.check_read()?;
        Ok(self.chain.balance(self.token, owner))
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ContractError> {
        self.chain.check_read()?;
        Ok(self.chain.allowance(self.token, owner, spender))
    }

    async fn approve(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxReceipt, ContractError> {
        self.chain.begin_write().await?;
        let (tx_hash, block) = {
            let mut ledger = self.chain.ledger();
            ledger.allowances.insert((self.token, from, spender), amount);
            ledger.mine()
        };
        Ok(self.chain.confirm(self.address(), tx_hash, block))
    }

    async fn mint(&self, _from: Address, to: Address, amount: U256) -> Result<TxReceipt, ContractError> {
        self.chain.begin_write().await?;
        let (tx_hash, block) = {
            let mut ledger = self.chain.ledger();
            let balance = ledger.balances.entry((self.token, to)).or_default();
            *balance = balance.saturating_add(amount);
            ledger.mine()
        };
        Ok(self.chain.confirm(self.address(), tx_hash, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_place_order_requires_allowance() {
        let chain = MockChain::new();
        let clob = chain.clob();
        let trader = Address::repeat_byte(0x42);

        let err = clob
            .place_order(trader, U256::from(10), U256::from(5), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Reverted { .. }));

        chain.set_allowance(Token::Btc, trader, chain.clob_address(), U256::MAX);
        clob.place_order(trader, U256::from(10), U256::from(5), true)
            .await
            .unwrap();
        let rows = clob.get_order_book().await.unwrap();
        assert_eq!(rows.bids.len(), 1);
        assert_eq!(chain.placed_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_mint_and_approve() {
        let chain = MockChain::new();
        let usdc = chain.token(Token::Usdc);
        let trader = Address::repeat_byte(0x42);

        usdc.mint(trader, trader, U256::from(7)).await.unwrap();
        assert_eq!(usdc.balance_of(trader).await.unwrap(), U256::from(7));

        usdc.approve(trader, chain.clob_address(), U256::from(3))
            .await
            .unwrap();
        assert_eq!(
            usdc.allowance(trader, chain.clob_address()).await.unwrap(),
            U256::from(3)
        );
    }

    #[tokio::test]
    async fn test_injected_read_failure() {
        let chain = MockChain::new();
        chain.fail_reads(true);
        assert!(chain.clob().get_order_book().await.is_err());
        assert_eq!(chain.order_book_reads(), 1);
    }

    #[tokio::test]
    async fn test_writes_publish_activity() {
        let chain = MockChain::new();
        let hub = chain.hub();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        hub.subscribe(move |batch| sink.lock().unwrap().extend(batch.iter().map(|e| e.address())));

        let btc = chain.token(Token::Btc);
        btc.mint(Address::ZERO, Address::ZERO, U256::from(1)).await.unwrap();
        chain.emit_match(1, 2, U256::from(3), U256::from(4));

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![chain.token_address(Token::Btc), chain.clob_address()]);
    }
}
