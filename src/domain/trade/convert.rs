//! Conversions from decoded logs to trade records.

use super::TradeRecord;
use crate::contract::OrderMatchedLog;
use alloy_primitives::U256;
use chrono::Utc;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeConversionError {
    OrderIdOutOfRange(U256),
}

impl fmt::Display for TradeConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeConversionError::OrderIdOutOfRange(id) => {
                write!(f, "Matched order id {} does not fit in u64", id)
            }
        }
    }
}

impl std::error::Error for TradeConversionError {}

impl TryFrom<&OrderMatchedLog> for TradeRecord {
    type Error = TradeConversionError;

    fn try_from(log: &OrderMatchedLog) -> Result<Self, Self::Error> {
        let id_1 = u64::try_from(log.order_id_1)
            .map_err(|_| TradeConversionError::OrderIdOutOfRange(log.order_id_1))?;
        let id_2 = u64::try_from(log.order_id_2)
            .map_err(|_| TradeConversionError::OrderIdOutOfRange(log.order_id_2))?;

        // Pending logs carry no block number yet.
        let timestamp = log
            .meta
            .block_number
            .unwrap_or_else(|| Utc::now().timestamp().max(0) as u64);

        Ok(Self {
            id: log.meta.event_id(),
            order_id_1: id_1,
            order_id_2: id_2,
            price: log.price,
            amount: log.amount,
            timestamp,
        })
    }
}
