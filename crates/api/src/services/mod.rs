//! Service layer for API operations.

mod fee_quoter;
mod position_stats;

pub use fee_quoter::{FeeQuoter, PoolFeeQuoter, QuoteError};
pub use position_stats::{PositionStatsService, StatsConfig};
