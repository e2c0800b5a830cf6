//! # Native Units
//!
//! Balances are held in the chain's smallest unit (wei, 18 decimals) so the
//! session never carries a floating-point amount.

use primitive_types::U256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::entities::strip_hex_prefix;
use crate::errors::PrimitiveError;

/// Decimal places of the native currency.
pub const NATIVE_DECIMALS: u32 = 18;

/// A non-negative amount of the native currency, in wei.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wei(pub U256);

impl Wei {
    /// Zero balance.
    pub const ZERO: Wei = Wei(U256::zero());

    /// Construct from a raw wei amount.
    pub fn from_wei(amount: u128) -> Self {
        Wei(U256::from(amount))
    }

    /// Construct from whole native tokens.
    pub fn from_tokens(tokens: u64) -> Self {
        Wei(U256::from(tokens) * U256::exp10(NATIVE_DECIMALS as usize))
    }

    /// Parse a decimal token amount such as `"1"`, `"0.1"` or `"5.0"`.
    pub fn from_ether_str(s: &str) -> Result<Self, PrimitiveError> {
        let t = s.trim();
        let (whole, frac) = match t.split_once('.') {
            Some((w, f)) => (w, f),
            None => (t, ""),
        };
        let digits_ok = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !digits_ok(whole) || !digits_ok(frac) {
            return Err(PrimitiveError::InvalidQuantity(s.to_string()));
        }
        if frac.len() > NATIVE_DECIMALS as usize {
            return Err(PrimitiveError::TooPrecise {
                input: s.to_string(),
                max: NATIVE_DECIMALS,
            });
        }

        let unit = U256::exp10(NATIVE_DECIMALS as usize);
        let whole = if whole.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(whole).map_err(|_| PrimitiveError::Overflow(s.to_string()))?
        };
        let frac = if frac.is_empty() {
            U256::zero()
        } else {
            let padded = format!("{:0<width$}", frac, width = NATIVE_DECIMALS as usize);
            U256::from_dec_str(&padded).map_err(|_| PrimitiveError::Overflow(s.to_string()))?
        };

        whole
            .checked_mul(unit)
            .and_then(|w| w.checked_add(frac))
            .map(Wei)
            .ok_or_else(|| PrimitiveError::Overflow(s.to_string()))
    }

    /// Parse a JSON-RPC hex quantity (`eth_getBalance` result).
    pub fn from_hex_quantity(s: &str) -> Result<Self, PrimitiveError> {
        let raw = strip_hex_prefix(s.trim());
        if raw.is_empty() {
            return Ok(Wei::ZERO);
        }
        U256::from_str_radix(raw, 16)
            .map(Wei)
            .map_err(|_| PrimitiveError::InvalidQuantity(s.to_string()))
    }

    /// Raw wei amount.
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Render in whole tokens rounded to `places` decimals (`0.5000`).
    pub fn to_ether_string(&self, places: u32) -> String {
        let places = places.min(NATIVE_DECIMALS);
        let drop = U256::exp10((NATIVE_DECIMALS - places) as usize);
        let rounded = self.0.saturating_add(drop / 2) / drop;
        if places == 0 {
            return rounded.to_string();
        }
        let scale = U256::exp10(places as usize);
        let whole = rounded / scale;
        let frac = rounded % scale;
        format!(
            "{}.{:0>width$}",
            whole,
            frac.to_string(),
            width = places as usize
        )
    }

    /// Render in whole tokens at full precision, without trailing zeros
    /// (`1.5`, `0.25`, `2`).
    pub fn to_plain_string(&self) -> String {
        let unit = U256::exp10(NATIVE_DECIMALS as usize);
        let whole = self.0 / unit;
        let frac = self.0 % unit;
        if frac.is_zero() {
            return whole.to_string();
        }
        let digits = format!(
            "{:0>width$}",
            frac.to_string(),
            width = NATIVE_DECIMALS as usize
        );
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for Wei {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Wei::from_ether_str(s)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ether_string(4))
    }
}

impl fmt::Debug for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wei({})", self.0)
    }
}

impl Serialize for Wei {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Always serialize as hex quantity with 0x prefix
        serializer.serialize_str(&format!("0x{:x}", self.0))
    }
}

impl<'de> Deserialize<'de> for Wei {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WeiVisitor;

        impl<'de> Visitor<'de> for WeiVisitor {
            type Value = Wei;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a hex quantity starting with 0x or a wei amount")
            }

            fn visit_str<E>(self, value: &str) -> Result<Wei, E>
            where
                E: de::Error,
            {
                if value.starts_with("0x") || value.starts_with("0X") {
                    Wei::from_hex_quantity(value).map_err(de::Error::custom)
                } else {
                    U256::from_dec_str(value)
                        .map(Wei)
                        .map_err(|_| de::Error::custom("invalid decimal wei amount"))
                }
            }

            fn visit_u64<E>(self, value: u64) -> Result<Wei, E>
            where
                E: de::Error,
            {
                Ok(Wei(U256::from(value)))
            }
        }

        deserializer.deserialize_any(WeiVisitor)
    }
}
