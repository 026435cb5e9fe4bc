//! Store abstractions consumed by the stats service.
//!
//! The Postgres and Redis adapters in this crate implement these traits;
//! tests substitute in-memory fakes.

use crate::cache::{decode_positions, entry_id};
use crate::error::StoreError;
use async_trait::async_trait;
use lp_stats_domain::pool::PoolModel;
use lp_stats_domain::{LiquidityEvent, LivePositionSnapshot};

/// Read access to the append-only liquidity ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Full history of one position, ordered by time with mints first on
    /// equal timestamps. An unknown position yields an empty history.
    async fn find_history(
        &self,
        chain: &str,
        id: u64,
        owner: &str,
    ) -> Result<Vec<LiquidityEvent>, StoreError>;

    /// Distinct ids of every position `owner` ever held on `chain`.
    async fn distinct_position_ids(&self, chain: &str, owner: &str)
    -> Result<Vec<u64>, StoreError>;

    /// Distinct pools `owner` holds positions in on `chain`.
    async fn distinct_pools(&self, chain: &str, owner: &str) -> Result<Vec<u64>, StoreError>;
}

/// Read access to the live position snapshot cache.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Every cached entry on `chain`, exactly as the indexer published it.
    async fn raw_positions(&self, chain: &str) -> Result<Vec<serde_json::Value>, StoreError>;

    /// Every cached entry on `chain` that decodes as a snapshot.
    async fn positions(&self, chain: &str) -> Result<Vec<LivePositionSnapshot>, StoreError> {
        Ok(decode_positions(chain, self.raw_positions(chain).await?))
    }

    /// Snapshot of a single position, `None` when the indexer no longer
    /// tracks it. Only the matching entry is decoded.
    async fn get(
        &self,
        chain: &str,
        id: u64,
    ) -> Result<Option<LivePositionSnapshot>, StoreError> {
        let matching = self
            .raw_positions(chain)
            .await?
            .into_iter()
            .filter(|entry| entry_id(entry) == Some(id));
        Ok(decode_positions(chain, matching).into_iter().next())
    }
}

/// Resolves pool identifiers to their current fee growth state.
#[async_trait]
pub trait PoolSource: Send + Sync {
    async fn fetch_pool(&self, chain: &str, pool_id: u64)
    -> Result<Option<PoolModel>, StoreError>;
}
