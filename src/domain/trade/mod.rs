//! Trade domain — executed matches observed on the CLOB.

mod convert;
pub mod feed;
pub mod state;

pub use convert::TradeConversionError;
pub use feed::{TradeHistoryFeed, TradeHistoryHandle};
pub use state::TradeHistory;

use crate::contract::PENDING_EVENT_ID;
use crate::shared::serde_util::u256_dec;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// One `OrderMatched` event. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// `"{tx_hash}-{log_index}"`, or [`PENDING_EVENT_ID`] for a pending log.
    pub id: String,
    pub order_id_1: u64,
    pub order_id_2: u64,
    #[serde(with = "u256_dec")]
    pub price: U256,
    #[serde(with = "u256_dec")]
    pub amount: U256,
    /// Block number of the match (not wall-clock time).
    pub timestamp: u64,
}

impl TradeRecord {
    /// Recorded from a log that was not mined yet; its id is not unique.
    pub fn is_pending(&self) -> bool {
        self.id == PENDING_EVENT_ID
    }
}
