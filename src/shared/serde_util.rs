//! Custom serde helpers for contract values and JSON-RPC wire formats.

/// Serializes a `U256` as a base-10 string (`"1500000000000000000"`).
///
/// Accepts base-10 strings, `0x`-prefixed hex strings and plain JSON numbers
/// on the way in.
pub mod u256_dec {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(U256::from(n)),
            Raw::Str(s) => {
                let parsed = match s.strip_prefix("0x") {
                    Some(hex) => U256::from_str_radix(hex, 16),
                    None => U256::from_str_radix(&s, 10),
                };
                parsed.map_err(|e| serde::de::Error::custom(format!("Invalid U256 '{}': {}", s, e)))
            }
        }
    }
}

/// JSON-RPC quantity (`"0x1b4"`) as an optional `u64`. `null` maps to `None`.
pub mod quantity_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&format!("{:#x}", v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse_quantity(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Parse a JSON-RPC hex quantity (`"0x1b4"`) into a `u64`.
pub fn parse_quantity(s: &str) -> Result<u64, String> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| format!("Quantity '{}' is missing the 0x prefix", s))?;
    u64::from_str_radix(digits, 16).map_err(|e| format!("Invalid quantity '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Amount {
        #[serde(with = "u256_dec")]
        value: U256,
    }

    #[derive(Debug, Deserialize)]
    struct Block {
        #[serde(default, with = "quantity_opt")]
        number: Option<u64>,
    }

    #[test]
    fn test_u256_serializes_as_decimal_string() {
        let a = Amount { value: U256::from(1_500_000_000_000_000_000u128) };
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"value":"1500000000000000000"}"#
        );
    }

    #[test]
    fn test_u256_accepts_hex_and_numbers() {
        let a: Amount = serde_json::from_str(r#"{"value":"0x10"}"#).unwrap();
        assert_eq!(a.value, U256::from(16));
        let b: Amount = serde_json::from_str(r#"{"value":42}"#).unwrap();
        assert_eq!(b.value, U256::from(42));
    }

    #[test]
    fn test_quantity_opt() {
        let b: Block = serde_json::from_str(r#"{"number":"0x1b4"}"#).unwrap();
        assert_eq!(b.number, Some(436));
        let b: Block = serde_json::from_str(r#"{"number":null}"#).unwrap();
        assert_eq!(b.number, None);
        let b: Block = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(b.number, None);
    }

    #[test]
    fn test_parse_quantity_requires_prefix() {
        assert!(parse_quantity("1b4").is_err());
        assert_eq!(parse_quantity("0x0"), Ok(0));
    }
}
