//! Repository implementations over the indexer's Postgres database.
//!
//! This module provides read-only repositories for the liquidity ledger,
//! owner positions and pool fee growth state.

mod pool_repository;
mod position_history_repository;
mod position_repository;

pub use pool_repository::{PoolRecord, PoolRepository, TickRecord, build_pool_model};
pub use position_history_repository::{
    PositionHistoryRecord, PositionHistoryRepository, decode_history,
};
pub use position_repository::PositionRepository;

use crate::error::StoreError;
use crate::store::{LedgerStore, PoolSource};
use async_trait::async_trait;
use lp_stats_domain::LiquidityEvent;
use lp_stats_domain::pool::PoolModel;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Database connection wrapper for repositories.
#[derive(Clone)]
pub struct Database {
    pool: Arc<PgPool>,
}

impl Database {
    /// Creates a new Database wrapper from a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Creates a new database connection from a connection string.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    /// * `max_connections` - Upper bound of pooled connections
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates a PositionHistoryRepository instance.
    #[must_use]
    pub fn history(&self) -> PositionHistoryRepository {
        PositionHistoryRepository::new(self.pool.clone())
    }

    /// Creates a PositionRepository instance.
    #[must_use]
    pub fn positions(&self) -> PositionRepository {
        PositionRepository::new(self.pool.clone())
    }

    /// Creates a PoolRepository instance.
    #[must_use]
    pub fn pools(&self) -> PoolRepository {
        PoolRepository::new(self.pool.clone())
    }

    /// Runs database migrations.
    ///
    /// # Errors
    /// Returns an error if migrations fail.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../../migrations/001_initial_schema.sql"))
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for Database {
    async fn find_history(
        &self,
        chain: &str,
        id: u64,
        owner: &str,
    ) -> Result<Vec<LiquidityEvent>, StoreError> {
        self.history().find_history(chain, id, owner).await
    }

    async fn distinct_position_ids(
        &self,
        chain: &str,
        owner: &str,
    ) -> Result<Vec<u64>, StoreError> {
        self.history().distinct_position_ids(chain, owner).await
    }

    async fn distinct_pools(&self, chain: &str, owner: &str) -> Result<Vec<u64>, StoreError> {
        self.positions().distinct_pools(chain, owner).await
    }
}

#[async_trait]
impl PoolSource for Database {
    async fn fetch_pool(
        &self,
        chain: &str,
        pool_id: u64,
    ) -> Result<Option<PoolModel>, StoreError> {
        self.pools().find_model(chain, pool_id).await
    }
}
