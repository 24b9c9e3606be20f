//! Pure conversion between human-readable decimal strings and 18-decimal
//! fixed-point integers.
//!
//! All math is exact `U256` integer arithmetic. Digit rendering and parsing
//! go through `alloy_primitives::utils`.

use std::fmt;

use alloy_primitives::{utils, U256};

/// Number of fractional digits in the token/contract fixed-point convention.
pub const FIXED_DECIMALS: u32 = 18;

/// Errors that can occur while parsing a decimal string into fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalingError {
    Empty,
    Negative(String),
    InvalidDecimal { input: String, reason: String },
    Overflow { context: String },
}

impl fmt::Display for ScalingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingError::Empty => write!(f, "Amount is empty"),
            ScalingError::Negative(v) => write!(f, "Amount must not be negative, got {}", v),
            ScalingError::InvalidDecimal { input, reason } => {
                write!(f, "Invalid decimal '{}': {}", input, reason)
            }
            ScalingError::Overflow { context } => write!(f, "Overflow: {}", context),
        }
    }
}

impl std::error::Error for ScalingError {}

/// `10^exp` as a `U256`, or `None` if it does not fit.
pub fn pow10(exp: u32) -> Option<U256> {
    let ten = U256::from(10u8);
    (0..exp).try_fold(U256::from(1u8), |acc, _| acc.checked_mul(ten))
}

/// One whole unit in 18-decimal fixed point (`10^18`).
pub fn wad() -> U256 {
    U256::from(1_000_000_000_000_000_000u128)
}

/// Parse a decimal string (e.g. `"12.5"`) into an 18-decimal fixed-point value.
pub fn parse_fixed(input: &str) -> Result<U256, ScalingError> {
    parse_units(input, FIXED_DECIMALS)
}

/// Parse a decimal string into an integer scaled by `10^decimals`.
///
/// Accepts `"12"`, `"12."`, `".5"` and `"12.5"`. Fractional digits beyond
/// `decimals` are rounded half-up into the last kept digit, as `parseEther`
/// does; `alloy_primitives::utils::parse_units` alone would truncate them.
pub fn parse_units(input: &str, decimals: u32) -> Result<U256, ScalingError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ScalingError::Empty);
    }
    if s.starts_with('-') {
        return Err(ScalingError::Negative(s.to_string()));
    }

    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid(s, "no digits"));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(s, "integer part must be ascii digits"));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(s, "fractional part must be ascii digits"));
    }

    // Split the fraction into the kept digits and the first dropped digit.
    let keep = (decimals as usize).min(frac_part.len());
    let (kept, dropped) = frac_part.split_at(keep);
    let round_up = dropped.bytes().next().is_some_and(|b| b >= b'5');

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let truncated = if kept.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, kept)
    };
    let overflow = || ScalingError::Overflow {
        context: format!("'{}' * 10^{}", s, decimals),
    };
    let units = u8::try_from(decimals).map_err(|_| overflow())?;
    let value = utils::parse_units(&truncated, units)
        .map_err(|_| overflow())?
        .get_absolute();

    if round_up {
        return value.checked_add(U256::from(1u8)).ok_or_else(overflow);
    }
    Ok(value)
}

/// Render `value / 10^decimals` with exactly `digits` fractional digits,
/// rounding half-up.
pub fn format_units_rounded(value: U256, decimals: u32, digits: u32) -> String {
    let scaled = if digits >= decimals {
        pow10(digits - decimals).and_then(|scale| value.checked_mul(scale))
    } else {
        pow10(decimals - digits).map(|divisor| {
            let (q, r) = (value / divisor, value % divisor);
            if r >= divisor - r {
                q + U256::from(1u8)
            } else {
                q
            }
        })
    };
    let Some(scaled) = scaled else {
        return value.to_string();
    };

    if digits == 0 {
        return scaled.to_string();
    }
    u8::try_from(digits)
        .ok()
        .and_then(|units| utils::format_units(scaled, units).ok())
        .unwrap_or_else(|| scaled.to_string())
}

fn invalid(input: &str, reason: &str) -> ScalingError {
    ScalingError::InvalidDecimal {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: u128) -> U256 {
        U256::from(n)
    }

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_fixed("100").unwrap(), units(100) * wad());
    }

    #[test]
    fn test_parse_fraction() {
        // 1.5 * 10^18
        assert_eq!(parse_fixed("1.5").unwrap(), units(1_500_000_000_000_000_000));
        assert_eq!(parse_fixed(".5").unwrap(), units(500_000_000_000_000_000));
        assert_eq!(parse_fixed("2.").unwrap(), units(2) * wad());
    }

    #[test]
    fn test_parse_smallest_unit() {
        assert_eq!(parse_fixed("0.000000000000000001").unwrap(), units(1));
    }

    #[test]
    fn test_parse_rounds_extra_digits() {
        assert_eq!(parse_fixed("0.0000000000000000015").unwrap(), units(2));
        assert_eq!(parse_fixed("0.0000000000000000014").unwrap(), units(1));
        assert_eq!(parse_units("1.25", 1).unwrap(), units(13));
    }

    #[test]
    fn test_parse_rounds_where_alloy_truncates() {
        let input = "0.0000000000000000015";
        let truncated = utils::parse_units(input, 18).unwrap().get_absolute();
        assert_eq!(truncated, units(1));
        assert_eq!(parse_fixed(input).unwrap(), truncated + units(1));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_fixed("  3 ").unwrap(), units(3) * wad());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(parse_fixed(""), Err(ScalingError::Empty));
        assert_eq!(parse_fixed("   "), Err(ScalingError::Empty));
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(matches!(parse_fixed("-1"), Err(ScalingError::Negative(_))));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_fixed("abc"), Err(ScalingError::InvalidDecimal { .. })));
        assert!(matches!(parse_fixed("1.2.3"), Err(ScalingError::InvalidDecimal { .. })));
        assert!(matches!(parse_fixed("1e5"), Err(ScalingError::InvalidDecimal { .. })));
        assert!(matches!(parse_fixed("."), Err(ScalingError::InvalidDecimal { .. })));
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "9".repeat(80);
        assert!(matches!(parse_fixed(&huge), Err(ScalingError::Overflow { .. })));
    }

    #[test]
    fn test_format_rounds_half_up() {
        // 1.2345675 -> 1.234568
        let v = units(1_234_567_500_000_000_000);
        assert_eq!(format_units_rounded(v, 18, 6), "1.234568");
        // 1.2345674999 -> 1.234567
        let v = units(1_234_567_499_999_999_999);
        assert_eq!(format_units_rounded(v, 18, 6), "1.234567");
    }

    #[test]
    fn test_format_pads_fraction() {
        assert_eq!(format_units_rounded(units(5) * wad(), 18, 6), "5.000000");
        assert_eq!(format_units_rounded(units(1), 18, 6), "0.000000");
        assert_eq!(format_units_rounded(units(500_000_000_000), 18, 6), "0.000001");
    }

    #[test]
    fn test_format_carry_into_integer() {
        // 0.9999995 -> 1.000000
        let v = units(999_999_500_000_000_000);
        assert_eq!(format_units_rounded(v, 18, 6), "1.000000");
    }

    #[test]
    fn test_format_more_digits_than_decimals() {
        assert_eq!(format_units_rounded(units(15), 1, 3), "1.500");
        assert_eq!(format_units_rounded(units(15), 0, 2), "15.00");
    }

    #[test]
    fn test_format_zero_digits() {
        assert_eq!(format_units_rounded(units(2_500_000_000_000_000_000), 18, 0), "3");
    }

    #[test]
    fn test_format_max_value_does_not_panic() {
        let s = format_units_rounded(U256::MAX, 18, 6);
        assert!(s.contains('.'));
    }
}
