//! Network constants for the CLOB front end.

/// Default JSON-RPC endpoint (local development node).
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Chain id of the local development node.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// How often the log poller asks the node for new blocks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;

/// How often a pending write polls for its receipt.
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;
