//! Prelude module for convenient imports.
//!
//! ```rust
//! use lp_stats_domain::prelude::*;
//! ```

pub use crate::account::{
    CollectedFees, LiquidityBalance, PositionAccount, PositionAccumulator, USD_DECIMALS, fold,
    round_usd,
};
pub use crate::error::DomainError;
pub use crate::event::{EventKind, LiquidityEvent, sort_ledger};
pub use crate::math::{FeeGrowth, fee_growth_inside, fees_earned};
pub use crate::pool::{OwedFees, PoolModel, TickFeeGrowth};
pub use crate::report::{FailedPosition, FeeQuote, FeesToClaim, PositionReport, PositionStatsEntry};
pub use crate::snapshot::LivePositionSnapshot;
pub use crate::token::{Token, TokenAmount};
