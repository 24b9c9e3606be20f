//! JSON-RPC transport — `RpcHttp` over `reqwest`.
//!
//! Only the handful of `eth_*` methods the front end needs. There is no retry
//! policy: a failed request surfaces to the caller, which logs it.

pub mod client;
pub mod wire;

pub use client::{RpcConfig, RpcHttp};
pub use wire::{Log, LogFilter, Receipt, TransactionRequest};
