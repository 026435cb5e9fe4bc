use crate::error::DomainError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pool token metadata needed to scale raw on-chain amounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Raw token amount in the token's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    pub fn new(amount: impl Into<U256>) -> Self {
        Self(amount.into())
    }

    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Parses a base-10 string such as a ledger `liquidity` column.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, DomainError> {
        U256::from_dec_str(raw.trim())
            .map(Self)
            .map_err(|_| DomainError::malformed(field, raw))
    }

    /// Scales the raw amount down by `decimals` into a fixed-point decimal.
    pub fn to_decimal(&self, decimals: u8) -> Result<Decimal, DomainError> {
        let raw = Decimal::from_str(&self.0.to_string())
            .map_err(|_| DomainError::Overflow(self.0.to_string()))?;
        let mut scaled = raw;
        scaled
            .set_scale(u32::from(decimals))
            .map_err(|_| DomainError::Overflow(self.0.to_string()))?;
        Ok(scaled)
    }
}

impl From<u64> for TokenAmount {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<u128> for TokenAmount {
    fn from(v: u128) -> Self {
        Self(U256::from(v))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
