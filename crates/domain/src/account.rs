//! Position accounting over a liquidity ledger.
//!
//! [`PositionAccumulator`] folds an ordered ledger into a [`PositionAccount`]:
//! the remaining liquidity, whether the position is closed, the USD value
//! still deposited and the fees already collected.
//!
//! Every `collect` contributes its USD value to the withdrawn total exactly
//! once. USD values are rounded half away from zero to four decimal places.

use crate::error::DomainError;
use crate::event::{EventKind, LiquidityEvent};
use primitive_types::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Decimal places of the reported deposited USD total.
pub const USD_DECIMALS: u32 = 4;

/// Rounds a USD amount to [`USD_DECIMALS`] places, keeping trailing zeros.
#[must_use]
pub fn round_usd(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(USD_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(USD_DECIMALS);
    rounded
}

/// Net liquidity of a position.
///
/// Minted and burned liquidity are kept apart so that a malformed ledger
/// burning more than it minted still yields a well-defined (negative)
/// balance instead of an underflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiquidityBalance {
    minted: U256,
    burned: U256,
}

impl LiquidityBalance {
    /// Adds minted liquidity.
    pub fn add(&mut self, amount: U256) {
        self.minted = self.minted.saturating_add(amount);
    }

    /// Subtracts burned liquidity.
    pub fn sub(&mut self, amount: U256) {
        self.burned = self.burned.saturating_add(amount);
    }

    /// Returns true when minted and burned liquidity cancel out.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.minted == self.burned
    }

    /// Returns true when more liquidity was burned than minted.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.burned > self.minted
    }

    /// Absolute value of the balance.
    #[must_use]
    pub fn magnitude(&self) -> U256 {
        match self.minted.cmp(&self.burned) {
            Ordering::Less => self.burned - self.minted,
            _ => self.minted - self.burned,
        }
    }
}

impl fmt::Display for LiquidityBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.magnitude())
        } else {
            write!(f, "{}", self.magnitude())
        }
    }
}

impl Serialize for LiquidityBalance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fees withdrawn from a position through `collect` events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectedFees {
    /// Token A collected.
    #[serde(rename = "tokenA", with = "rust_decimal::serde::float")]
    pub token_a: Decimal,
    /// Token B collected.
    #[serde(rename = "tokenB", with = "rust_decimal::serde::float")]
    pub token_b: Decimal,
    /// USD value of everything collected.
    #[serde(rename = "inUSD", with = "rust_decimal::serde::float")]
    pub in_usd: Decimal,
}

/// Aggregate state of a position derived from its ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionAccount {
    pub liquidity_balance: LiquidityBalance,
    pub closed: bool,
    pub gross_deposited: Decimal,
    pub gross_withdrawn_or_collected: Decimal,
    pub collected_fees: CollectedFees,
    pub deposited_usd_total: Decimal,
    /// Number of events folded.
    pub event_count: usize,
}

/// Incremental fold over a position's ledger.
#[derive(Debug, Clone, Default)]
pub struct PositionAccumulator {
    liquidity: LiquidityBalance,
    gross_deposited: Decimal,
    gross_out: Decimal,
    fees: CollectedFees,
    event_count: usize,
}

impl PositionAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event. Events must be fed in ledger order.
    ///
    /// # Errors
    /// Returns [`DomainError::TotalOverflow`] if a running total leaves the
    /// decimal range; the accumulator is left unchanged.
    pub fn apply(&mut self, event: &LiquidityEvent) -> Result<(), DomainError> {
        let usd = event.total_usd_value;
        match event.kind {
            EventKind::Mint => {
                self.gross_deposited = checked_add("gross_deposited", self.gross_deposited, usd)?;
                self.liquidity.add(event.liquidity.as_u256());
            }
            EventKind::Burn => {
                self.gross_out = checked_add("gross_withdrawn", self.gross_out, usd)?;
                self.liquidity.sub(event.liquidity.as_u256());
            }
            EventKind::Collect => {
                let fees = CollectedFees {
                    token_a: checked_add("collected_token_a", self.fees.token_a, event.token_a)?,
                    token_b: checked_add("collected_token_b", self.fees.token_b, event.token_b)?,
                    in_usd: checked_add("collected_usd", self.fees.in_usd, usd)?,
                };
                self.gross_out = checked_add("gross_withdrawn", self.gross_out, usd)?;
                self.fees = fees;
            }
        }
        self.event_count += 1;
        Ok(())
    }

    /// Finalizes the fold.
    ///
    /// # Errors
    /// Returns [`DomainError::TotalOverflow`] if the net deposited value
    /// leaves the decimal range.
    pub fn finish(self) -> Result<PositionAccount, DomainError> {
        let net = self
            .gross_deposited
            .checked_sub(self.gross_out)
            .ok_or(DomainError::TotalOverflow {
                field: "deposited_usd_total",
            })?;
        Ok(PositionAccount {
            liquidity_balance: self.liquidity,
            closed: self.liquidity.is_zero(),
            gross_deposited: self.gross_deposited,
            gross_withdrawn_or_collected: self.gross_out,
            collected_fees: self.fees,
            deposited_usd_total: round_usd(net),
            event_count: self.event_count,
        })
    }
}

fn checked_add(
    field: &'static str,
    total: Decimal,
    amount: Decimal,
) -> Result<Decimal, DomainError> {
    total
        .checked_add(amount)
        .ok_or(DomainError::TotalOverflow { field })
}

/// Folds an ordered ledger into its [`PositionAccount`].
///
/// # Errors
/// Returns [`DomainError::TotalOverflow`] if a ledger total overflows.
pub fn fold<'a, I>(events: I) -> Result<PositionAccount, DomainError>
where
    I: IntoIterator<Item = &'a LiquidityEvent>,
{
    let mut acc = PositionAccumulator::new();
    for event in events {
        acc.apply(event)?;
    }
    acc.finish()
}
