//! Event-driven order-book refresh.
//!
//! Any log emitted by the CLOB re-reads the book. Nothing polls on a timer.

use super::OrderBookFeed;
use crate::events::{spawn_refresh, EventHub, RefreshHandle};
use std::sync::Arc;

pub struct OrderBookRefresher;

impl OrderBookRefresher {
    /// Start refreshing `feed` from `hub`. The book is read once immediately.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(feed: Arc<OrderBookFeed>, hub: Arc<EventHub>) -> RefreshHandle {
        let clob = feed.clob_address();
        spawn_refresh(
            hub,
            move |event| event.address() == clob,
            move || {
                let feed = Arc::clone(&feed);
                async move {
                    tracing::trace!("Refetching order book");
                    // Failures are logged by the feed and the previous book is kept.
                    let _ = feed.refetch().await;
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AppState;
    use crate::testing::MockChain;
    use alloy_primitives::{Address, U256};
    use std::time::Duration;

    async fn wait_until(mut check: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !check() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_clob_event_triggers_refetch() {
        let chain = MockChain::new();
        let state = Arc::new(AppState::new());
        let feed = Arc::new(OrderBookFeed::new(chain.clob(), Arc::clone(&state)));
        let _handle = OrderBookRefresher::spawn(Arc::clone(&feed), chain.hub());

        wait_until(|| chain.order_book_reads() == 1).await;

        chain.seed_order(Address::ZERO, U256::from(100), U256::from(5), true);
        chain.emit_activity(chain.clob_address());
        wait_until(|| feed.merged_bids().len() == 1).await;
    }

    #[tokio::test]
    async fn test_other_contract_events_are_ignored() {
        let chain = MockChain::new();
        let state = Arc::new(AppState::new());
        let feed = Arc::new(OrderBookFeed::new(chain.clob(), state));
        let _handle = OrderBookRefresher::spawn(feed, chain.hub());
        wait_until(|| chain.order_book_reads() == 1).await;

        chain.emit_activity(Address::repeat_byte(0x99));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(chain.order_book_reads(), 1);
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let chain = MockChain::new();
        let hub = chain.hub();
        let feed = Arc::new(OrderBookFeed::new(chain.clob(), Arc::new(AppState::new())));
        let handle = OrderBookRefresher::spawn(feed, Arc::clone(&hub));
        assert_eq!(hub.listener_count(), 1);
        drop(handle);
        assert_eq!(hub.listener_count(), 0);
    }
}
