//! Prelude module for convenient imports.

pub use crate::error::{ApiError, ConfigError};
pub use crate::routes::create_router;
pub use crate::server::{ApiServer, ServerConfig, connect_state};
pub use crate::services::{
    FeeQuoter, PoolFeeQuoter, PositionStatsService, QuoteError, StatsConfig,
};
pub use crate::state::{AppState, Network};
