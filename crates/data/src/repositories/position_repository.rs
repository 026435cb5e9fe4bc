//! Position repository for owner-to-pool lookups.

use super::position_history_repository::to_id;
use crate::error::StoreError;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository over the `positions` table.
#[derive(Clone)]
pub struct PositionRepository {
    pool: Arc<PgPool>,
}

impl PositionRepository {
    /// Creates a new PositionRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds the distinct pools an owner has positions in.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn distinct_pools(&self, chain: &str, owner: &str) -> Result<Vec<u64>, StoreError> {
        let pools: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT pool FROM positions WHERE chain = $1 AND owner = $2 ORDER BY pool",
        )
        .bind(chain)
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(pools
            .into_iter()
            .map(|(pool,)| to_id("pool", pool))
            .collect::<Result<_, _>>()?)
    }
}
