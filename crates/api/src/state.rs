//! Application state shared across handlers.

use crate::services::PositionStatsService;
use lp_stats_data::{LedgerStore, SnapshotStore};
use std::fmt;
use std::sync::Arc;

/// Chain served by this instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    name: Arc<str>,
}

impl Network {
    /// Creates a network from its name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// Network name as used in store keys and queries.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Chain queried by every endpoint.
    pub network: Network,
    /// Liquidity ledger.
    pub ledger: Arc<dyn LedgerStore>,
    /// Live position cache.
    pub snapshots: Arc<dyn SnapshotStore>,
    /// Position stats service.
    pub stats: Arc<PositionStatsService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        network: Network,
        ledger: Arc<dyn LedgerStore>,
        snapshots: Arc<dyn SnapshotStore>,
        stats: PositionStatsService,
    ) -> Self {
        Self {
            network,
            ledger,
            snapshots,
            stats: Arc::new(stats),
        }
    }
}
