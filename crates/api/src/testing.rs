//! In-memory stores for service and handler tests.

use crate::services::{PoolFeeQuoter, PositionStatsService, StatsConfig};
use crate::state::{AppState, Network};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lp_stats_data::{LedgerStore, PoolSource, SnapshotStore, StoreError};
use lp_stats_domain::pool::{PoolModel, TickFeeGrowth};
use lp_stats_domain::token::Token;
use lp_stats_domain::{DomainError, LiquidityEvent, LivePositionSnapshot};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const Q64: u128 = 1 << 64;

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[derive(Default)]
pub struct FakeLedger {
    histories: HashMap<(String, u64, String), Vec<LiquidityEvent>>,
    ids: HashMap<(String, String), BTreeSet<u64>>,
    pools: HashMap<(String, String), Vec<u64>>,
    failing: HashSet<u64>,
    slow: HashSet<u64>,
    down: bool,
}

impl FakeLedger {
    pub fn with_history(
        mut self,
        chain: &str,
        id: u64,
        owner: &str,
        events: Vec<LiquidityEvent>,
    ) -> Self {
        self.histories
            .insert((chain.to_string(), id, owner.to_string()), events);
        self.held(chain, id, owner)
    }

    fn held(mut self, chain: &str, id: u64, owner: &str) -> Self {
        self.ids
            .entry((chain.to_string(), owner.to_string()))
            .or_default()
            .insert(id);
        self
    }

    pub fn with_pools(mut self, chain: &str, owner: &str, pools: Vec<u64>) -> Self {
        self.pools.insert((chain.to_string(), owner.to_string()), pools);
        self
    }

    /// History reads of `id` fail with a decode error.
    pub fn failing(mut self, chain: &str, id: u64, owner: &str) -> Self {
        self.failing.insert(id);
        self.held(chain, id, owner)
    }

    /// History reads of `id` never complete in test time.
    pub fn slow(mut self, chain: &str, id: u64, owner: &str) -> Self {
        self.slow.insert(id);
        self.held(chain, id, owner)
    }

    /// Every read fails as if the database were unreachable.
    pub fn down(mut self) -> Self {
        self.down = true;
        self
    }
}

#[async_trait]
impl LedgerStore for FakeLedger {
    async fn find_history(
        &self,
        chain: &str,
        id: u64,
        owner: &str,
    ) -> Result<Vec<LiquidityEvent>, StoreError> {
        if self.down {
            return Err(unavailable());
        }
        if self.slow.contains(&id) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        if self.failing.contains(&id) {
            return Err(DomainError::UnknownEventType("swap".to_string()).into());
        }
        Ok(self
            .histories
            .get(&(chain.to_string(), id, owner.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn distinct_position_ids(
        &self,
        chain: &str,
        owner: &str,
    ) -> Result<Vec<u64>, StoreError> {
        if self.down {
            return Err(unavailable());
        }
        Ok(self
            .ids
            .get(&(chain.to_string(), owner.to_string()))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn distinct_pools(&self, chain: &str, owner: &str) -> Result<Vec<u64>, StoreError> {
        if self.down {
            return Err(unavailable());
        }
        Ok(self
            .pools
            .get(&(chain.to_string(), owner.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeSnapshots {
    entries: HashMap<String, Vec<Value>>,
    loads: AtomicUsize,
    down: bool,
}

impl FakeSnapshots {
    pub fn with_snapshot(self, chain: &str, snapshot: LivePositionSnapshot) -> Self {
        let entry = serde_json::to_value(snapshot).unwrap();
        self.with_entry(chain, entry)
    }

    /// Publishes `entry` exactly as given.
    pub fn with_entry(mut self, chain: &str, entry: Value) -> Self {
        self.entries.entry(chain.to_string()).or_default().push(entry);
        self
    }

    pub fn down(mut self) -> Self {
        self.down = true;
        self
    }

    /// Number of times the chain's entries were read.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for FakeSnapshots {
    async fn raw_positions(&self, chain: &str) -> Result<Vec<Value>, StoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(unavailable());
        }
        Ok(self.entries.get(chain).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakePools {
    pools: HashMap<u64, PoolModel>,
    stalled: bool,
}

impl FakePools {
    pub fn with_pool(mut self, pool: PoolModel) -> Self {
        self.pools.insert(pool.id, pool);
        self
    }

    /// Pool reads never complete in test time.
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }
}

#[async_trait]
impl PoolSource for FakePools {
    async fn fetch_pool(
        &self,
        _chain: &str,
        pool_id: u64,
    ) -> Result<Option<PoolModel>, StoreError> {
        if self.stalled {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Ok(self.pools.get(&pool_id).cloned())
    }
}

/// Pool whose fee growth quotes `snapshot` at 0.00005005 WAX and 0.2 USDT.
pub fn wax_pool(id: u64) -> PoolModel {
    let mut ticks = BTreeMap::new();
    ticks.insert(
        -100,
        TickFeeGrowth {
            fee_growth_outside_a_x64: 2 * Q64,
            fee_growth_outside_b_x64: Q64,
        },
    );
    PoolModel {
        id,
        chain: "wax".to_string(),
        token_a: Token::new("WAX", 8),
        token_b: Token::new("USDT", 4),
        tick_current: 0,
        fee_growth_global_a_x64: 10 * Q64,
        fee_growth_global_b_x64: 4 * Q64,
        ticks,
    }
}

pub fn snapshot(id: u64, owner: &str, pool: u64) -> LivePositionSnapshot {
    LivePositionSnapshot {
        id,
        owner: owner.to_string(),
        pool,
        tick_lower: -100,
        tick_upper: 100,
        liquidity: 1_000,
        fee_growth_inside_a_last_x64: 3 * Q64,
        fee_growth_inside_b_last_x64: Q64,
        fees_owed_a: 5,
        fees_owed_b: 0,
        extra: Default::default(),
    }
}

pub fn stats_service(
    ledger: Arc<FakeLedger>,
    snapshots: Arc<FakeSnapshots>,
    pools: FakePools,
) -> PositionStatsService {
    PositionStatsService::new(
        ledger,
        snapshots,
        Arc::new(PoolFeeQuoter::new(Arc::new(pools))),
        StatsConfig {
            concurrency: 4,
            position_timeout: Duration::from_millis(200),
        },
    )
}

pub fn app_state(ledger: FakeLedger, snapshots: FakeSnapshots, pools: FakePools) -> AppState {
    let ledger = Arc::new(ledger);
    let snapshots = Arc::new(snapshots);
    let stats = stats_service(ledger.clone(), snapshots.clone(), pools);
    AppState::new(Network::new("wax"), ledger, snapshots, stats)
}
