//! Live fee quoting for open positions.

use async_trait::async_trait;
use lp_stats_data::{PoolSource, StoreError};
use lp_stats_domain::{DomainError, FeeQuote, LivePositionSnapshot};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while quoting unclaimed fees.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The pool of the position has no stored state.
    #[error("pool {pool} not found on {chain}")]
    MissingPoolData {
        /// Chain name.
        chain: String,
        /// Pool id.
        pool: u64,
    },
    /// The pool store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The position or pool state cannot be quoted.
    #[error(transparent)]
    Math(#[from] DomainError),
}

/// Quotes the fees an open position could claim right now.
#[async_trait]
pub trait FeeQuoter: Send + Sync {
    /// Quotes `snapshot` against the current state of its pool.
    async fn quote(
        &self,
        chain: &str,
        snapshot: &LivePositionSnapshot,
    ) -> Result<FeeQuote, QuoteError>;
}

/// Fee quoter computing fees from pool fee growth.
#[derive(Clone)]
pub struct PoolFeeQuoter {
    pools: Arc<dyn PoolSource>,
}

impl PoolFeeQuoter {
    /// Creates a quoter reading pools from `pools`.
    #[must_use]
    pub fn new(pools: Arc<dyn PoolSource>) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl FeeQuoter for PoolFeeQuoter {
    async fn quote(
        &self,
        chain: &str,
        snapshot: &LivePositionSnapshot,
    ) -> Result<FeeQuote, QuoteError> {
        let pool = self
            .pools
            .fetch_pool(chain, snapshot.pool)
            .await?
            .ok_or_else(|| QuoteError::MissingPoolData {
                chain: chain.to_string(),
                pool: snapshot.pool,
            })?;

        let owed = pool.fees_owed(snapshot)?;
        debug!(
            chain,
            position = snapshot.id,
            pool = snapshot.pool,
            fees_a = %owed.fees_a,
            fees_b = %owed.fees_b,
            "Quoted unclaimed fees"
        );
        Ok(owed.into())
    }
}
