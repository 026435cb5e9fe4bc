//! Per-account position statistics.
//!
//! Composes, for every position an account ever held, the folded ledger
//! (deposited USD, closed flag, collected fees) with a live quote of the
//! fees it could still claim.

use super::fee_quoter::FeeQuoter;
use futures::StreamExt;
use futures::stream;
use lp_stats_data::{LedgerStore, SnapshotStore, StoreError};
use lp_stats_domain::report::FailedPosition;
use lp_stats_domain::{LivePositionSnapshot, PositionReport, PositionStatsEntry, fold};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tuning of the account report fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsConfig {
    /// Positions processed at the same time.
    pub concurrency: usize,
    /// Upper bound on each remote read of a position: the ledger read, the
    /// snapshot load and the fee quote are bounded separately.
    pub position_timeout: Duration,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            position_timeout: Duration::from_secs(10),
        }
    }
}

/// Live snapshots of a chain by position id, or why they could not be read.
type LiveSnapshots = Result<HashMap<u64, LivePositionSnapshot>, String>;

/// Service producing position stats for an account.
#[derive(Clone)]
pub struct PositionStatsService {
    ledger: Arc<dyn LedgerStore>,
    snapshots: Arc<dyn SnapshotStore>,
    quoter: Arc<dyn FeeQuoter>,
    config: StatsConfig,
}

impl PositionStatsService {
    /// Creates a new stats service.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        snapshots: Arc<dyn SnapshotStore>,
        quoter: Arc<dyn FeeQuoter>,
        config: StatsConfig,
    ) -> Self {
        Self {
            ledger,
            snapshots,
            quoter,
            config,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> StatsConfig {
        self.config
    }

    /// Builds the report of a single position.
    ///
    /// A missing snapshot leaves `feesToClaim` empty. A failed snapshot read
    /// or fee quote does the same and records the reason in `feesError`.
    ///
    /// # Errors
    /// Returns an error if the ledger cannot be read or decoded.
    pub async fn position_report(
        &self,
        chain: &str,
        id: u64,
        owner: &str,
    ) -> Result<PositionReport, StoreError> {
        let (report, snapshot) = tokio::join!(
            self.ledger_report(chain, id, owner),
            self.snapshots.get(chain, id)
        );

        let report = report?;
        let snapshot = snapshot.map_err(|e| {
            warn!(chain, id, error = %e, "Live position snapshot unavailable");
            e.to_string()
        });
        let snapshot = snapshot
            .as_ref()
            .map(Option::as_ref)
            .map_err(String::as_str);
        Ok(self.with_claimable_fees(chain, report, snapshot).await)
    }

    /// Builds the stats of every position `owner` ever held on `chain`.
    ///
    /// Entries keep the order of the position ids. The chain's snapshots are
    /// loaded once for the whole account. A position whose ledger read fails
    /// or times out becomes a [`FailedPosition`] entry and does not affect the
    /// others; a failed or slow fee quote only sets `feesError`.
    ///
    /// # Errors
    /// Returns an error if the position ids cannot be listed.
    pub async fn account_report(
        &self,
        chain: &str,
        owner: &str,
    ) -> Result<Vec<PositionStatsEntry>, StoreError> {
        let ids = self.ledger.distinct_position_ids(chain, owner).await?;
        info!(chain, owner, positions = ids.len(), "Building account position stats");
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let live = self.load_snapshots(chain).await;
        let live = &live;
        let timeout = self.config.position_timeout;

        let entries = stream::iter(ids)
            .map(|id| async move {
                let work = self.ledger_report(chain, id, owner);
                let report = match tokio::time::timeout(timeout, work).await {
                    Ok(Ok(report)) => report,
                    Ok(Err(e)) => {
                        warn!(chain, id, owner, error = %e, "Position stats failed");
                        return PositionStatsEntry::Failed(FailedPosition {
                            id,
                            error: e.to_string(),
                        });
                    }
                    Err(_) => {
                        warn!(
                            chain,
                            id,
                            owner,
                            timeout_ms = timeout.as_millis() as u64,
                            "Position ledger read timed out"
                        );
                        return PositionStatsEntry::Failed(FailedPosition {
                            id,
                            error: format!("timed out after {}ms", timeout.as_millis()),
                        });
                    }
                };

                let snapshot = live
                    .as_ref()
                    .map(|snapshots| snapshots.get(&id))
                    .map_err(String::as_str);
                let report = self.with_claimable_fees(chain, report, snapshot).await;
                PositionStatsEntry::Report(report)
            })
            .buffered(self.config.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        Ok(entries)
    }

    /// Reads and folds the ledger of one position.
    async fn ledger_report(
        &self,
        chain: &str,
        id: u64,
        owner: &str,
    ) -> Result<PositionReport, StoreError> {
        let events = self.ledger.find_history(chain, id, owner).await?;
        let account = fold(&events)?;
        debug!(
            chain,
            id,
            events = account.event_count,
            liquidity = %account.liquidity_balance,
            closed = account.closed,
            "Folded position ledger"
        );
        Ok(PositionReport::from_account(id, &account))
    }

    async fn load_snapshots(&self, chain: &str) -> LiveSnapshots {
        let timeout = self.config.position_timeout;
        match tokio::time::timeout(timeout, self.snapshots.positions(chain)).await {
            Ok(Ok(positions)) => {
                debug!(chain, snapshots = positions.len(), "Loaded live positions");
                Ok(positions.into_iter().map(|p| (p.id, p)).collect())
            }
            Ok(Err(e)) => {
                warn!(chain, error = %e, "Live position snapshots unavailable");
                Err(e.to_string())
            }
            Err(_) => {
                warn!(chain, timeout_ms = timeout.as_millis() as u64, "Snapshot load timed out");
                Err(format!("timed out after {}ms", timeout.as_millis()))
            }
        }
    }

    /// Quotes the fees `snapshot` could still claim into `report`.
    async fn with_claimable_fees(
        &self,
        chain: &str,
        report: PositionReport,
        snapshot: Result<Option<&LivePositionSnapshot>, &str>,
    ) -> PositionReport {
        let snapshot = match snapshot {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return report,
            Err(e) => return report.with_fees_error(format!("snapshot unavailable: {e}")),
        };

        let timeout = self.config.position_timeout;
        let id = report.id;
        match tokio::time::timeout(timeout, self.quoter.quote(chain, snapshot)).await {
            Ok(Ok(quote)) => report.with_quote(quote),
            Ok(Err(e)) => {
                warn!(chain, id, pool = snapshot.pool, error = %e, "Fee quote failed");
                report.with_fees_error(e.to_string())
            }
            Err(_) => {
                warn!(
                    chain,
                    id,
                    pool = snapshot.pool,
                    timeout_ms = timeout.as_millis() as u64,
                    "Fee quote timed out"
                );
                report.with_fees_error(format!(
                    "fee quote timed out after {}ms",
                    timeout.as_millis()
                ))
            }
        }
    }
}
