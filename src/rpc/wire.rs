//! Wire types for the JSON-RPC methods in use.

use crate::contract::{ContractEvent, LogMeta};
use crate::shared::serde_util::quantity_opt;
use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

// ─── Envelope ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

// ─── Transactions ────────────────────────────────────────────────────────────

/// Parameters for `eth_call` and `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

impl TransactionRequest {
    /// A read-only call.
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from: None,
            to,
            data: data.into(),
        }
    }

    /// A write signed by the node's account `from`.
    pub fn send(from: Address, to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from: Some(from),
            to,
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: B256,
    #[serde(default, with = "quantity_opt")]
    pub block_number: Option<u64>,
    /// `1` success, `0` reverted. Absent on pre-Byzantium chains.
    #[serde(default, with = "quantity_opt")]
    pub status: Option<u64>,
}

impl Receipt {
    pub fn is_reverted(&self) -> bool {
        self.status == Some(0)
    }
}

// ─── Logs ────────────────────────────────────────────────────────────────────

/// `eth_getLogs` filter for a set of contracts over an inclusive block range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Vec<Address>,
    #[serde(with = "quantity_opt")]
    pub from_block: Option<u64>,
    #[serde(with = "quantity_opt")]
    pub to_block: Option<u64>,
}

impl LogFilter {
    pub fn range(address: Vec<Address>, from_block: u64, to_block: u64) -> Self {
        Self {
            address,
            from_block: Some(from_block),
            to_block: Some(to_block),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    #[serde(default)]
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default, with = "quantity_opt")]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub transaction_hash: Option<B256>,
    #[serde(default, with = "quantity_opt")]
    pub log_index: Option<u64>,
    #[serde(default)]
    pub removed: bool,
}

impl Log {
    pub fn meta(&self) -> LogMeta {
        LogMeta {
            address: self.address,
            block_number: self.block_number,
            transaction_hash: self.transaction_hash,
            log_index: self.log_index,
        }
    }

    pub fn decode(&self) -> ContractEvent {
        ContractEvent::decode(self.meta(), &self.topics, &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_request_omits_from() {
        let tx = TransactionRequest::call(Address::repeat_byte(1), vec![0xab, 0xcd]);
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json.get("from").is_none());
        assert_eq!(json["data"], "0xabcd");
    }

    #[test]
    fn test_receipt_status() {
        let json = format!(
            r#"{{"transactionHash":"{}","blockNumber":"0x10","status":"0x0","gasUsed":"0x1"}}"#,
            B256::repeat_byte(2)
        );
        let receipt: Receipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt.block_number, Some(16));
        assert!(receipt.is_reverted());
    }

    #[test]
    fn test_log_filter_quantities() {
        let filter = LogFilter::range(vec![Address::ZERO], 1, 26);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["fromBlock"], "0x1");
        assert_eq!(json["toBlock"], "0x1a");
    }

    #[test]
    fn test_pending_log_fields() {
        let json = format!(
            r#"{{"address":"{}","topics":[],"data":"0x","blockNumber":null,"transactionHash":null,"logIndex":null}}"#,
            Address::repeat_byte(3)
        );
        let log: Log = serde_json::from_str(&json).unwrap();
        assert_eq!(log.meta().block_number, None);
        assert!(matches!(log.decode(), ContractEvent::Activity { topic0: None, .. }));
    }
}
