//! Display formatting for fixed-point values, addresses and bigint-safe JSON.
//!
//! Every formatter is total: malformed or absent input degrades to a
//! zero-equivalent placeholder instead of an error.

pub mod json;
pub mod num;

pub use json::{safe_json_string, values_equal};
pub use num::{calculate_order_value, format_amount, format_balance, format_price};

/// Placeholder shown for a missing address.
pub const UNKNOWN_ADDRESS: &str = "Unknown";

/// Shorten an address to `0x1234...abcd` (first 6 + `...` + last 4 characters).
pub fn truncate_address(address: Option<&str>) -> String {
    let Some(address) = address.filter(|a| !a.is_empty()) else {
        return UNKNOWN_ADDRESS.to_string();
    };

    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}
