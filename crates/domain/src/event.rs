//! Liquidity ledger events.
//!
//! A position's ledger is an append-only sequence of `mint`, `burn` and
//! `collect` events written by the indexer. Events are ordered by time, and
//! within the same timestamp a `mint` always precedes the `burn`/`collect`
//! events that discharge its liquidity.

use crate::error::DomainError;
use crate::token::TokenAmount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Liquidity added to the position.
    Mint,
    /// Liquidity removed from the position.
    Burn,
    /// Owed tokens withdrawn from the position.
    Collect,
}

impl EventKind {
    /// Tie-break rank for events sharing a timestamp.
    ///
    /// Mints come first; burns and collects keep their store order.
    #[must_use]
    pub fn tie_break_rank(self) -> u8 {
        match self {
            Self::Mint => 0,
            Self::Burn | Self::Collect => 1,
        }
    }

    /// Converts the kind to its ledger string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::Burn => "burn",
            Self::Collect => "collect",
        }
    }
}

impl FromStr for EventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mint" => Ok(Self::Mint),
            "burn" => Ok(Self::Burn),
            "collect" => Ok(Self::Collect),
            other => Err(DomainError::UnknownEventType(other.to_string())),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityEvent {
    /// Event kind.
    pub kind: EventKind,
    /// When the event happened on chain.
    pub time: DateTime<Utc>,
    /// Liquidity delta in pool units. Zero for collects.
    pub liquidity: TokenAmount,
    /// Token A amount moved by the event.
    pub token_a: Decimal,
    /// Token B amount moved by the event.
    pub token_b: Decimal,
    /// USD value of the event at the time it happened.
    pub total_usd_value: Decimal,
}

impl LiquidityEvent {
    /// Creates a mint event.
    pub fn mint(time: DateTime<Utc>, liquidity: impl Into<TokenAmount>, usd: Decimal) -> Self {
        Self {
            kind: EventKind::Mint,
            time,
            liquidity: liquidity.into(),
            token_a: Decimal::ZERO,
            token_b: Decimal::ZERO,
            total_usd_value: usd,
        }
    }

    /// Creates a burn event.
    pub fn burn(time: DateTime<Utc>, liquidity: impl Into<TokenAmount>, usd: Decimal) -> Self {
        Self {
            kind: EventKind::Burn,
            ..Self::mint(time, liquidity, usd)
        }
    }

    /// Creates a collect event.
    pub fn collect(time: DateTime<Utc>, token_a: Decimal, token_b: Decimal, usd: Decimal) -> Self {
        Self {
            kind: EventKind::Collect,
            time,
            liquidity: TokenAmount::zero(),
            token_a,
            token_b,
            total_usd_value: usd,
        }
    }
}

/// Sorts a ledger by `(time, kind)` with mints first on equal timestamps.
///
/// The sort is stable, so burns and collects sharing a timestamp keep the
/// order the store returned them in.
pub fn sort_ledger(events: &mut [LiquidityEvent]) {
    events.sort_by_key(|e| (e.time, e.kind.tie_break_rank()));
}
