//! Unified client error types.

use crate::shared::ScalingError;
use thiserror::Error;

/// Top-level client error.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Invalid amount: {0}")]
    Scaling(#[from] ScalingError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// JSON-RPC transport errors.
#[derive(Error, Debug)]
pub enum RpcError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),
}

/// Errors raised by the contract collaborators (CLOB and tokens).
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("No connected account")]
    NoAccount,

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("ABI decode failed: {0}")]
    Decode(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("{0}")]
    Other(String),
}
