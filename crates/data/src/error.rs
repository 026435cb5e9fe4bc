//! Store error types.

use lp_stats_domain::DomainError;
use thiserror::Error;

/// Errors raised by the ledger, pool and snapshot stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Postgres query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Redis command or connection failure.
    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),
    /// Cached payload is not valid JSON.
    #[error("cache payload error: {0}")]
    Payload(#[from] serde_json::Error),
    /// A stored row could not be decoded into a domain value.
    #[error(transparent)]
    Decode(#[from] DomainError),
}

impl StoreError {
    /// Returns true for failures of the backing service rather than the data.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Cache(_))
    }
}
