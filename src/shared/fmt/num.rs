//! Fixed-point (18-decimal) display helpers.

use crate::shared::scaling::{format_units_rounded, FIXED_DECIMALS};
use alloy_primitives::U256;

/// Shown for absent or zero values.
pub const ZERO_DISPLAY: &str = "0.00";

const PRICE_DIGITS: u32 = 6;
const BALANCE_DIGITS: u32 = 4;

/// Format a fixed-point price as a decimal string with 6 fractional digits.
pub fn format_price(price: Option<U256>) -> String {
    format_fixed(price, PRICE_DIGITS)
}

/// Format a fixed-point amount as a decimal string with 6 fractional digits.
pub fn format_amount(amount: Option<U256>) -> String {
    format_fixed(amount, PRICE_DIGITS)
}

/// Format a token balance with 4 fractional digits. Absent balances show as zero.
pub fn format_balance(balance: Option<U256>) -> String {
    format_units_rounded(balance.unwrap_or(U256::ZERO), FIXED_DECIMALS, BALANCE_DIGITS)
}

/// Notional value `price * amount` (both 18-decimal) with 6 fractional digits.
pub fn calculate_order_value(price: Option<U256>, amount: Option<U256>) -> String {
    match (price, amount) {
        (Some(p), Some(a)) if !p.is_zero() && !a.is_zero() => match p.checked_mul(a) {
            Some(product) => format_units_rounded(product, FIXED_DECIMALS * 2, PRICE_DIGITS),
            None => {
                tracing::debug!("Order value overflow for price {} amount {}", p, a);
                ZERO_DISPLAY.to_string()
            }
        },
        _ => ZERO_DISPLAY.to_string(),
    }
}

fn format_fixed(value: Option<U256>, digits: u32) -> String {
    match value {
        Some(v) if !v.is_zero() => format_units_rounded(v, FIXED_DECIMALS, digits),
        _ => ZERO_DISPLAY.to_string(),
    }
}
