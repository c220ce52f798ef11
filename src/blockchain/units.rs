//! Conversion between wei and human-readable ether amounts.
//!
//! Amounts cross the contract boundary as wei (`U256`). The decimal form is
//! only produced or consumed at the edges: form input, config and display.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Number of fractional digits in one ether.
pub const ETHER_DECIMALS: usize = 18;

/// Reasons a decimal string cannot be turned into an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("'{0}' is not a decimal number")]
    Malformed(String),
    #[error("'{0}' has more than {ETHER_DECIMALS} decimal places")]
    TooPrecise(String),
    #[error("'{0}' does not fit in 256 bits")]
    Overflow(String),
}

/// A currency amount held in its smallest unit (wei).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    pub const fn wei(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse an unsigned decimal ether amount such as `"0.01"` or `"12"`.
    ///
    /// Signs, exponents and more than 18 fractional digits are rejected
    /// rather than rounded.
    pub fn from_decimal(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        let (int, frac) = match trimmed.split_once('.') {
            Some((int, frac)) => {
                if frac.is_empty() {
                    return Err(AmountError::Malformed(input.to_string()));
                }
                (int, frac)
            }
            None => (trimmed, ""),
        };

        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int.is_empty() && frac.is_empty()) || !digits_only(int) || !digits_only(frac) {
            return Err(AmountError::Malformed(input.to_string()));
        }
        if frac.len() > ETHER_DECIMALS {
            return Err(AmountError::TooPrecise(input.to_string()));
        }

        let int = if int.is_empty() { "0" } else { int };
        let normalized = if frac.is_empty() {
            int.to_string()
        } else {
            format!("{int}.{frac}")
        };

        parse_ether(&normalized)
            .map(Self)
            .map_err(|_| AmountError::Overflow(input.to_string()))
    }
}

impl From<U256> for Amount {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl From<Amount> for U256 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Canonical decimal form: no trailing fractional zeros, no dangling point.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = format_ether(self.0);
        match raw.split_once('.') {
            Some((int, frac)) => {
                let frac = frac.trim_end_matches('0');
                if frac.is_empty() {
                    f.write_str(int)
                } else {
                    write!(f, "{int}.{frac}")
                }
            }
            None => f.write_str(&raw),
        }
    }
}

/// Serialized as the decimal ether string so JSON output stays readable.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_decimal(&raw).map_err(serde::de::Error::custom)
    }
}
