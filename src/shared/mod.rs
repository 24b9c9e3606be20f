//! Shared newtypes and utilities used across all domain modules.

pub mod fmt;
pub mod scaling;
pub mod serde_util;

pub use fmt::{
    calculate_order_value, format_amount, format_balance, format_price, safe_json_string,
    truncate_address, values_equal,
};
pub use scaling::{format_units_rounded, parse_fixed, parse_units, wad, ScalingError, FIXED_DECIMALS};

pub use alloy_primitives::{Address, B256, U256};

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

// ─── TradeSide ───────────────────────────────────────────────────────────────

/// Side selected in the order form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[default]
    Buy,
    Sell,
}

impl TradeSide {
    /// `placeOrder`'s `isBid` flag for this side.
    pub fn is_bid(&self) -> bool {
        matches!(self, TradeSide::Buy)
    }

    /// Token the trader pays with, and therefore has to approve.
    pub fn payment_token(&self) -> Token {
        match self {
            TradeSide::Buy => Token::Btc,
            TradeSide::Sell => Token::Usdc,
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Buy"),
            TradeSide::Sell => write!(f, "Sell"),
        }
    }
}

// ─── Token ───────────────────────────────────────────────────────────────────

/// The two tokens traded on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    Btc,
    Usdc,
}

impl Token {
    pub const ALL: [Token; 2] = [Token::Btc, Token::Usdc];

    /// Ticker symbol, also the contract name in the deployment manifest.
    pub fn symbol(&self) -> &'static str {
        match self {
            Token::Btc => "BTC",
            Token::Usdc => "USDC",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Token::Btc => "Bitcoin",
            Token::Usdc => "USD Coin",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ─── TokenAmounts ────────────────────────────────────────────────────────────

/// One optional amount per token. `None` means "not loaded yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenAmounts {
    btc: Option<U256>,
    usdc: Option<U256>,
}

impl TokenAmounts {
    pub fn get(&self, token: Token) -> Option<U256> {
        match token {
            Token::Btc => self.btc,
            Token::Usdc => self.usdc,
        }
    }

    /// Copy with one token's amount replaced.
    pub fn with(mut self, token: Token, amount: Option<U256>) -> Self {
        match token {
            Token::Btc => self.btc = amount,
            Token::Usdc => self.usdc = amount,
        }
        self
    }
}

// ─── InFlight ────────────────────────────────────────────────────────────────

/// Single-flight flag for a user-triggered write: at most one in flight.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

impl InFlight {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Take the flag. `None` if a write is already in flight.
    pub fn try_start(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }
}

/// Clears its [`InFlight`] flag on drop, including when the write future is dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Parse a user-entered token amount. `None` for empty, unparseable or
/// non-positive input.
pub fn parse_positive_amount(input: &str) -> Option<U256> {
    parse_fixed(input).ok().filter(|v| !v.is_zero())
}
