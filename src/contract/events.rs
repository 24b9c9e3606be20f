//! Decoded contract events.
//!
//! `OrderMatched` is decoded into its fields; every other log from a watched
//! contract is kept as generic activity, which is enough to invalidate the book.

use super::abi::IClob;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;

/// Id of a log that is not mined yet.
pub const PENDING_EVENT_ID: &str = "pending";

/// Where a log came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMeta {
    pub address: Address,
    /// `None` while the log is still pending.
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub log_index: Option<u64>,
}

impl LogMeta {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            block_number: None,
            transaction_hash: None,
            log_index: None,
        }
    }

    /// `true` until the log has both a transaction hash and a log index.
    pub fn is_pending(&self) -> bool {
        self.transaction_hash.is_none() || self.log_index.is_none()
    }

    /// `"{tx_hash}-{log_index}"`, unique per mined log. Pending logs get
    /// [`PENDING_EVENT_ID`], which identifies nothing.
    pub fn event_id(&self) -> String {
        match (self.transaction_hash, self.log_index) {
            (Some(hash), Some(index)) => format!("{}-{}", hash, index),
            _ => PENDING_EVENT_ID.to_string(),
        }
    }
}

/// A decoded `OrderMatched(orderId1, orderId2, price, amount)` log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMatchedLog {
    pub meta: LogMeta,
    pub order_id_1: U256,
    pub order_id_2: U256,
    pub price: U256,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractEvent {
    OrderMatched(OrderMatchedLog),
    /// Any other log emitted by a watched contract.
    Activity { meta: LogMeta, topic0: Option<B256> },
}

impl ContractEvent {
    /// Decode a raw log. Logs that are not a well-formed `OrderMatched`
    /// become [`ContractEvent::Activity`].
    pub fn decode(meta: LogMeta, topics: &[B256], data: &[u8]) -> Self {
        let topic0 = topics.first().copied();

        if topic0 == Some(IClob::OrderMatched::SIGNATURE_HASH) {
            match IClob::OrderMatched::decode_raw_log(topics.iter().copied(), data) {
                Ok(ev) => {
                    return ContractEvent::OrderMatched(OrderMatchedLog {
                        meta,
                        order_id_1: ev.orderId1,
                        order_id_2: ev.orderId2,
                        price: ev.price,
                        amount: ev.amount,
                    });
                }
                Err(e) => {
                    tracing::warn!("Undecodable OrderMatched log at {:?}: {}", meta, e);
                }
            }
        }

        ContractEvent::Activity { meta, topic0 }
    }

    pub fn meta(&self) -> &LogMeta {
        match self {
            ContractEvent::OrderMatched(log) => &log.meta,
            ContractEvent::Activity { meta, .. } => meta,
        }
    }

    pub fn address(&self) -> Address {
        self.meta().address
    }

    pub fn as_order_matched(&self) -> Option<&OrderMatchedLog> {
        match self {
            ContractEvent::OrderMatched(log) => Some(log),
            ContractEvent::Activity { .. } => None,
        }
    }
}
