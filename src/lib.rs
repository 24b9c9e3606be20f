//! # CLOB front end
//!
//! A headless trading front end for an on-chain central limit order book
//! (CLOB) quoting BTC against USDC.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Shared types, fixed-point formatting, domain models (order book
//!    aggregation, trade history), always available
//! 2. **Contracts** — `ClobContract` / `TokenContract` collaborator traits, the
//!    ABI and the event decoding
//! 3. **Store & events** — reactive `AppState` cells and the `EventHub` that
//!    drives event-based refreshes
//! 4. **JSON-RPC** — `RpcHttp`, RPC-backed contracts and the log poller
//!    (`http` feature)
//! 5. **High-Level Client** — `ClobClient` wiring everything into one page,
//!    rendered by the `view` components
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clob_frontend::prelude::*;
//!
//! let deployment = Deployment::from_file("deployment.json")?;
//! let rpc = Arc::new(RpcHttp::new(RpcConfig::default())?);
//! let client = ClobClient::builder()
//!     .rpc(rpc, &deployment)?
//!     .account(account)
//!     .build()?;
//!
//! let session = client.mount();
//! client.form().set_price("25000");
//! client.form().set_amount("0.5");
//! client.form().submit().await?;
//! println!("{}", client.render_page());
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, fixed-point scaling and display formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network constants.
pub mod network;

/// Deployment manifest (contract addresses per chain).
pub mod config;

// ── Layer 2: Contracts ───────────────────────────────────────────────────────

/// CLOB and token collaborators, ABI and events.
pub mod contract;

// ── Layer 3: Store & events ──────────────────────────────────────────────────

/// Reactive application state.
pub mod store;

/// Contract event hub and event-driven refresh tasks.
pub mod events;

// ── Layer 4: JSON-RPC ────────────────────────────────────────────────────────

/// JSON-RPC transport for an Ethereum node.
#[cfg(feature = "http")]
pub mod rpc;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `ClobClient` — the primary entry point.
pub mod client;

/// Presentational components rendered from the store.
pub mod view;

/// In-memory chain for tests and demos.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared types
    pub use crate::shared::{Address, Token, TradeSide, U256};

    // Formatting
    pub use crate::shared::{
        calculate_order_value, format_amount, format_balance, format_price, parse_fixed,
        truncate_address,
    };

    // Domain types — order book
    pub use crate::domain::order::Order;
    pub use crate::domain::orderbook::{MergedOrderBook, MergedPriceLevel, OrderBookFeed};

    // Domain types — trades, tokens, approvals, order entry
    pub use crate::domain::approval::{ApprovalGate, ApprovalView};
    pub use crate::domain::form::{OrderForm, OrderInputs};
    pub use crate::domain::token::{MintAction, TokenBalances};
    pub use crate::domain::trade::{TradeHistory, TradeHistoryFeed, TradeRecord};

    // Contracts
    pub use crate::contract::{ClobContract, ContractEvent, TokenContract, TxReceipt};

    // Errors
    pub use crate::error::{ClientError, ContractError, RpcError};

    // Config + network
    pub use crate::config::Deployment;
    pub use crate::network::DEFAULT_RPC_URL;

    // Store + events
    pub use crate::events::EventHub;
    pub use crate::store::{AppState, Notification, NotificationLevel};

    // JSON-RPC
    #[cfg(feature = "http")]
    pub use crate::events::poller::{LogPoller, PollerConfig};
    #[cfg(feature = "http")]
    pub use crate::rpc::{RpcConfig, RpcHttp};

    // Client + views
    pub use crate::client::{ClobClient, ClobClientBuilder, Session};
    pub use crate::view::Page;
}
