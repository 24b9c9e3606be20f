//! Trade-history feed: `OrderMatched` events into the store.

use super::TradeRecord;
use crate::contract::ContractEvent;
use crate::events::{EventHub, ListenerId};
use crate::store::AppState;
use alloy_primitives::Address;
use std::sync::Arc;

/// Turns observed `OrderMatched` events from one CLOB into trade records.
#[derive(Debug)]
pub struct TradeHistoryFeed {
    state: Arc<AppState>,
    clob: Address,
}

impl TradeHistoryFeed {
    pub fn new(state: Arc<AppState>, clob: Address) -> Self {
        Self { state, clob }
    }

    /// Snapshot of the accumulated records, newest first.
    pub fn records(&self) -> Vec<TradeRecord> {
        self.state
            .trade_history
            .with(|h| h.records().iter().cloned().collect())
    }

    /// Record every `OrderMatched` event of the batch. Returns how many
    /// records were new.
    pub fn ingest(&self, batch: &[ContractEvent]) -> usize {
        let records: Vec<TradeRecord> = batch
            .iter()
            .filter(|e| e.address() == self.clob)
            .filter_map(ContractEvent::as_order_matched)
            .filter_map(|log| match TradeRecord::try_from(log) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Dropping OrderMatched event {}: {}", log.meta.event_id(), e);
                    None
                }
            })
            .collect();

        if records.is_empty() {
            return 0;
        }

        let mut added = 0;
        self.state.trade_history.modify(|history| {
            added = history.record_batch(records);
            added > 0
        });
        if added > 0 {
            tracing::debug!("Recorded {} new trade(s)", added);
        }
        added
    }

    /// Register on the hub. Listening stops when the handle is dropped.
    pub fn attach(self: Arc<Self>, hub: Arc<EventHub>) -> TradeHistoryHandle {
        let feed = Arc::clone(&self);
        let listener = hub.subscribe(move |batch| {
            feed.ingest(batch);
        });
        TradeHistoryHandle { hub, listener }
    }
}

/// Live registration of a [`TradeHistoryFeed`].
#[derive(Debug)]
pub struct TradeHistoryHandle {
    hub: Arc<EventHub>,
    listener: ListenerId,
}

impl Drop for TradeHistoryHandle {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.listener);
    }
}
