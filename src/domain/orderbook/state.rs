//! Order-book feed — reads the CLOB and keeps the merged book in the store.

use super::{aggregate, MergedOrderBook, MergedPriceLevel};
use crate::contract::ClobContract;
use crate::error::ContractError;
use crate::shared::values_equal;
use crate::store::{AppState, Cell};
use alloy_primitives::Address;
use async_lock::Mutex;
use std::sync::Arc;

/// Clears the loading flag even if the read future is dropped.
struct LoadingGuard<'a>(&'a Cell<bool>);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a Cell<bool>) -> Self {
        flag.replace(true);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.replace(false);
    }
}

/// Exposes `merged_asks`, `merged_bids`, `is_loading` and `refetch` over the
/// order-book cell of an [`AppState`].
pub struct OrderBookFeed {
    clob: Arc<dyn ClobContract>,
    state: Arc<AppState>,
    fetch_lock: Mutex<()>,
}

impl OrderBookFeed {
    pub fn new(clob: Arc<dyn ClobContract>, state: Arc<AppState>) -> Self {
        Self {
            clob,
            state,
            fetch_lock: Mutex::new(()),
        }
    }

    pub fn clob_address(&self) -> Address {
        self.clob.address()
    }

    /// Asks, best (lowest) first.
    pub fn merged_asks(&self) -> Vec<MergedPriceLevel> {
        self.state.order_book.with(|book| book.asks().to_vec())
    }

    /// Bids, best (highest) first.
    pub fn merged_bids(&self) -> Vec<MergedPriceLevel> {
        self.state.order_book.with(|book| book.bids().to_vec())
    }

    pub fn book(&self) -> MergedOrderBook {
        self.state.order_book.get()
    }

    /// `true` while a read is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.order_book_loading.get()
    }

    /// Re-read the full book and replace the stored one.
    ///
    /// Reads are serialized, so the last call to start is the last to land.
    /// On failure the previous book stays in place and the error is returned.
    pub async fn refetch(&self) -> Result<(), ContractError> {
        let _serial = self.fetch_lock.lock().await;
        let _loading = LoadingGuard::start(&self.state.order_book_loading);

        match self.clob.get_order_book().await {
            Ok(rows) => {
                let book = aggregate(rows);
                tracing::debug!(
                    asks = book.asks().len(),
                    bids = book.bids().len(),
                    "Order book refreshed"
                );
                // Subscribers are only woken when the book actually changed.
                let changed = self
                    .state
                    .order_book
                    .with(|current| !values_equal(current, &book));
                if changed {
                    self.state.order_book.replace(book);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Order book read failed, keeping previous book: {}", e);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for OrderBookFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBookFeed")
            .field("clob", &self.clob.address())
            .field("is_loading", &self.is_loading())
            .finish()
    }
}
