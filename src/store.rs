//! Application state — explicit, shareable reactive cells.
//!
//! `AppState` is created once per page session and passed around as
//! `Arc<AppState>`. Each slice of state is a named [`Cell`]; readers take a
//! snapshot or subscribe for changes. Writes either replace the slice or edit
//! it in place.
//!
//! Cells fed from the chain (order book, trade history, balances, allowances)
//! are written only by their feed inside this crate. Cells owned by the UI
//! (account, selected price, trade side) have public setters here.

use crate::domain::orderbook::MergedOrderBook;
use crate::domain::trade::TradeHistory;
use crate::shared::{format_price, Token, TokenAmounts, TradeSide};
use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// Maximum number of notifications kept for display.
pub const MAX_NOTIFICATIONS: usize = 20;

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single reactive value.
#[derive(Debug)]
pub struct Cell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Cell<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that is notified on every replacement.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Replace the value, returning the previous one.
    pub(crate) fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// Build the next value from the current one and publish it.
    pub(crate) fn update(&self, f: impl FnOnce(&T) -> T) {
        self.tx.send_modify(|current| {
            let next = f(current);
            *current = next;
        });
    }

    /// Edit the value in place. Subscribers are notified only when `f`
    /// returns `true`.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}

impl<T: Clone + Default> Default for Cell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient message surfaced after a user-initiated write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

// ─── AppState ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AppState {
    /// Connected wallet address; `None` disables every write.
    pub account: Cell<Option<Address>>,
    /// Price picked from the book, as display text.
    pub selected_price: Cell<String>,
    pub trade_side: Cell<TradeSide>,
    pub order_book: Cell<MergedOrderBook>,
    pub order_book_loading: Cell<bool>,
    pub trade_history: Cell<TradeHistory>,
    pub balances: Cell<TokenAmounts>,
    /// Allowances granted to the CLOB contract.
    pub allowances: Cell<TokenAmounts>,
    pub notifications: Cell<Vec<Notification>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State with a trade-history cap (oldest records evicted first).
    pub fn with_trade_history_limit(limit: Option<usize>) -> Self {
        Self {
            trade_history: Cell::new(TradeHistory::new(limit)),
            ..Self::default()
        }
    }

    pub fn set_account(&self, account: Option<Address>) {
        if self.account.get() != account {
            tracing::info!("Connected account changed: {:?}", account);
            // Cached per-account reads no longer apply.
            self.balances.replace(TokenAmounts::default());
            self.allowances.replace(TokenAmounts::default());
        }
        self.account.replace(account);
    }

    pub fn set_selected_price(&self, price: impl Into<String>) {
        self.selected_price.replace(price.into());
    }

    pub fn set_trade_side(&self, side: TradeSide) {
        self.trade_side.replace(side);
    }

    /// A price level was clicked: remember its price and switch the form side.
    /// Ask rows select `Sell`, bid rows select `Buy`.
    pub fn select_level(&self, price: U256, from_asks: bool) {
        self.set_selected_price(format_price(Some(price)));
        self.set_trade_side(if from_asks {
            TradeSide::Sell
        } else {
            TradeSide::Buy
        });
    }

    pub fn balance(&self, token: Token) -> Option<U256> {
        self.balances.with(|b| b.get(token))
    }

    pub fn allowance(&self, token: Token) -> Option<U256> {
        self.allowances.with(|a| a.get(token))
    }

    pub(crate) fn set_balance(&self, token: Token, amount: Option<U256>) {
        self.balances.update(|b| b.with(token, amount));
    }

    pub(crate) fn set_allowance(&self, token: Token, amount: Option<U256>) {
        self.allowances.update(|a| a.with(token, amount));
    }

    /// Post a notification, dropping the oldest beyond [`MAX_NOTIFICATIONS`].
    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification {
            level,
            message: message.into(),
            created_at: Utc::now(),
        };
        self.notifications.update(|list| {
            let mut next = list.clone();
            next.push(notification);
            let overflow = next.len().saturating_sub(MAX_NOTIFICATIONS);
            next.drain(..overflow);
            next
        });
    }

    pub fn clear_notifications(&self) {
        self.notifications.replace(Vec::new());
    }
}
