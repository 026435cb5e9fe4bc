//! Data access for the position stats service.
//!
//! - Postgres repositories over the indexer's ledger, positions and pools
//! - Redis cache of live position snapshots
//! - Store traits the stats service is written against

/// Redis snapshot cache.
pub mod cache;
/// Store error types.
pub mod error;
/// Postgres repositories.
pub mod repositories;
/// Store traits.
pub mod store;

pub use cache::{RedisSnapshotCache, owned_by};
pub use error::StoreError;
pub use repositories::Database;
pub use store::{LedgerStore, PoolSource, SnapshotStore};
