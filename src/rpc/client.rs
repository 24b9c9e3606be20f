//! Low-level JSON-RPC client — `RpcHttp`.
//!
//! One method per `eth_*` call. Returns wire types; ABI encoding and decoding
//! happen in `contract::rpc`.

use super::wire::{
    JsonRpcRequest, JsonRpcResponse, Log, LogFilter, Receipt, TransactionRequest,
};
use crate::error::RpcError;
use crate::network::{DEFAULT_RECEIPT_POLL_INTERVAL_MS, DEFAULT_RPC_URL};
use crate::shared::serde_util::parse_quantity;

use alloy_primitives::{Bytes, B256};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const NO_PARAMS: [(); 0] = [];

/// Endpoint and receipt-polling settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    pub url: String,
    pub receipt_poll_interval: Duration,
    /// `None` waits for a receipt indefinitely.
    pub receipt_timeout: Option<Duration>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            receipt_poll_interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_INTERVAL_MS),
            receipt_timeout: None,
        }
    }
}

impl RpcConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }
}

/// Low-level JSON-RPC client for an Ethereum node.
pub struct RpcHttp {
    config: RpcConfig,
    client: Client,
    next_id: AtomicU64,
}

impl RpcHttp {
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            config,
            client: builder.build()?,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    // ── Chain ────────────────────────────────────────────────────────────

    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let raw: String = self.request("eth_chainId", NO_PARAMS).await?;
        parse_quantity(&raw).map_err(RpcError::InvalidResponse)
    }

    pub async fn block_number(&self) -> Result<u64, RpcError> {
        let raw: String = self.request("eth_blockNumber", NO_PARAMS).await?;
        parse_quantity(&raw).map_err(RpcError::InvalidResponse)
    }

    // ── Calls & transactions ─────────────────────────────────────────────

    /// `eth_call` against the latest block.
    pub async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, RpcError> {
        self.request("eth_call", (tx, "latest")).await
    }

    /// `eth_sendTransaction`; the node signs for `tx.from`.
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, RpcError> {
        self.request("eth_sendTransaction", [tx]).await
    }

    pub async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, RpcError> {
        self.request("eth_getTransactionReceipt", [hash]).await
    }

    /// Poll until `hash` is mined.
    ///
    /// Waits indefinitely unless [`RpcConfig::receipt_timeout`] is set.
    pub async fn wait_for_receipt(&self, hash: B256) -> Result<Receipt, RpcError> {
        let interval = self.config.receipt_poll_interval;
        let mut waited = Duration::ZERO;

        loop {
            if let Some(receipt) = self.get_transaction_receipt(hash).await? {
                tracing::debug!(block = ?receipt.block_number, "Transaction {} mined", hash);
                return Ok(receipt);
            }

            if let Some(timeout) = self.config.receipt_timeout {
                if waited >= timeout {
                    return Err(RpcError::Timeout(format!("receipt of {}", hash)));
                }
            }

            futures_timer::Delay::new(interval).await;
            waited += interval;
        }
    }

    // ── Logs ─────────────────────────────────────────────────────────────

    pub async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, RpcError> {
        self.request("eth_getLogs", [filter]).await
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn request<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let resp = self.client.post(&self.config.url).json(&body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(RpcError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let envelope: JsonRpcResponse = resp.json().await?;
        if let Some(err) = envelope.error {
            tracing::debug!(code = err.code, "{} returned an error: {}", method, err.message);
            return Err(RpcError::JsonRpc {
                code: err.code,
                message: err.message,
            });
        }

        serde_json::from_value(envelope.result)
            .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))
    }
}

impl std::fmt::Debug for RpcHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcHttp").field("url", &self.config.url).finish()
    }
}
