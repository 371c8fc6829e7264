use crate::error::{FaucetError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of wei in one ether.
pub const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Decimal places of the ether unit.
pub const ETHER_DECIMALS: u32 = 18;

/// An amount of value in wei, the smallest indivisible unit.
///
/// Arithmetic is checked: an overflowing or underflowing operation yields
/// [`FaucetError::ArithmeticOverflow`] instead of wrapping. Serialized as a
/// decimal string so amounts above `u64::MAX` survive JSON.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Wei(pub u128);

impl Wei {
    pub const ZERO: Self = Self(0);

    pub fn new(wei: u128) -> Self {
        Self(wei)
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(FaucetError::ArithmeticOverflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(FaucetError::ArithmeticOverflow)
    }

    pub fn checked_mul(self, factor: u128) -> Result<Self> {
        self.0
            .checked_mul(factor)
            .map(Self)
            .ok_or(FaucetError::ArithmeticOverflow)
    }

    /// Converts an ether-denominated decimal into wei.
    ///
    /// Rejects negative amounts and amounts with more than 18 fractional digits.
    pub fn from_ether(ether: Decimal) -> Result<Self> {
        if ether.is_sign_negative() && !ether.is_zero() {
            return Err(FaucetError::ValidationError(format!(
                "Amount must not be negative: {ether}"
            )));
        }

        let scaled = ether
            .checked_mul(Decimal::from(WEI_PER_ETHER))
            .ok_or(FaucetError::ArithmeticOverflow)?;

        if !scaled.fract().is_zero() {
            return Err(FaucetError::ValidationError(format!(
                "Amount {ether} has more than {ETHER_DECIMALS} decimal places"
            )));
        }

        scaled
            .to_u128()
            .map(Self)
            .ok_or(FaucetError::ArithmeticOverflow)
    }
}

/// Parses ether-denominated text such as `"0.1"` or `"9999.92"` into wei.
pub fn parse_ether(text: &str) -> Result<Wei> {
    let ether = Decimal::from_str_exact(text.trim())
        .map_err(|e| FaucetError::ValidationError(format!("Invalid ether amount {text:?}: {e}")))?;
    Wei::from_ether(ether)
}

impl TryFrom<String> for Wei {
    type Error = FaucetError;

    fn try_from(value: String) -> Result<Self> {
        value
            .trim()
            .parse::<u128>()
            .map(Self)
            .map_err(|e| FaucetError::ValidationError(format!("Invalid wei amount {value:?}: {e}")))
    }
}

impl From<Wei> for String {
    fn from(wei: Wei) -> Self {
        wei.0.to_string()
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chain time in seconds since the unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn secs(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
