//! Per-position report returned by the account stats endpoint.

use crate::account::{CollectedFees, PositionAccount};
use crate::pool::OwedFees;
use rust_decimal::Decimal;
use serde::Serialize;

/// Unclaimed fees quoted from the live pool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    #[serde(rename = "feesA", with = "rust_decimal::serde::str")]
    pub fees_a: Decimal,
    #[serde(rename = "feesB", with = "rust_decimal::serde::str")]
    pub fees_b: Decimal,
}

impl FeeQuote {
    /// Creates a quote with trailing zeros stripped.
    pub fn new(fees_a: Decimal, fees_b: Decimal) -> Self {
        Self {
            fees_a: fees_a.normalize(),
            fees_b: fees_b.normalize(),
        }
    }
}

impl From<OwedFees> for FeeQuote {
    fn from(owed: OwedFees) -> Self {
        Self::new(owed.fees_a, owed.fees_b)
    }
}

/// Fee quote slot of a report; serializes to `{}` when no quote exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeesToClaim {
    Quoted(FeeQuote),
    Unavailable {},
}

impl FeesToClaim {
    #[must_use]
    pub fn quote(&self) -> Option<&FeeQuote> {
        match self {
            Self::Quoted(q) => Some(q),
            Self::Unavailable {} => None,
        }
    }
}

/// Economic summary of one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub id: u64,
    #[serde(rename = "depositedUSDTotal", with = "rust_decimal::serde::float")]
    pub deposited_usd_total: Decimal,
    pub closed: bool,
    pub collected_fees: CollectedFees,
    pub fees_to_claim: FeesToClaim,
    /// Why the fee quote is missing for an open position, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_error: Option<String>,
}

impl PositionReport {
    /// Builds a report from a folded ledger with no fee quote.
    pub fn from_account(id: u64, account: &PositionAccount) -> Self {
        Self {
            id,
            deposited_usd_total: account.deposited_usd_total,
            closed: account.closed,
            collected_fees: account.collected_fees,
            fees_to_claim: FeesToClaim::Unavailable {},
            fees_error: None,
        }
    }

    /// Attaches a fee quote.
    #[must_use]
    pub fn with_quote(mut self, quote: FeeQuote) -> Self {
        self.fees_to_claim = FeesToClaim::Quoted(quote);
        self
    }

    /// Records a failed fee quote, leaving the other fields intact.
    #[must_use]
    pub fn with_fees_error(mut self, error: impl Into<String>) -> Self {
        self.fees_to_claim = FeesToClaim::Unavailable {};
        self.fees_error = Some(error.into());
        self
    }
}

/// A position whose ledger could not be read or folded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPosition {
    pub id: u64,
    pub error: String,
}

/// One entry of an account report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PositionStatsEntry {
    Report(PositionReport),
    Failed(FailedPosition),
}

impl PositionStatsEntry {
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Report(r) => r.id,
            Self::Failed(f) => f.id,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&PositionReport> {
        match self {
            Self::Report(r) => Some(r),
            Self::Failed(_) => None,
        }
    }
}
