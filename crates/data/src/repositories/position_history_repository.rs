//! Position history repository over the liquidity ledger.

use crate::error::StoreError;
use lp_stats_domain::token::TokenAmount;
use lp_stats_domain::{DomainError, EventKind, LiquidityEvent, sort_ledger};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Database record for one ledger row.
///
/// Numeric columns are read as text so that malformed values surface as
/// [`DomainError::MalformedAmount`] with the offending value.
#[derive(Debug, Clone)]
pub struct PositionHistoryRecord {
    /// Store insertion sequence.
    pub seq: i64,
    /// Chain name.
    pub chain: String,
    /// Position id.
    pub id: i64,
    /// Owning account.
    pub owner: String,
    /// Event type (mint, burn, collect).
    pub event_type: String,
    /// Event timestamp.
    pub time: chrono::DateTime<chrono::Utc>,
    /// Liquidity delta.
    pub liquidity: Option<String>,
    /// Token A amount.
    pub token_a: Option<String>,
    /// Token B amount.
    pub token_b: Option<String>,
    /// USD value of the event.
    pub total_usd_value: String,
}

impl PositionHistoryRecord {
    /// Creates a PositionHistoryRecord from a database row.
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            seq: row.try_get("seq")?,
            chain: row.try_get("chain")?,
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            event_type: row.try_get("type")?,
            time: row.try_get("time")?,
            liquidity: row.try_get("liquidity")?,
            token_a: row.try_get("token_a")?,
            token_b: row.try_get("token_b")?,
            total_usd_value: row.try_get("total_usd_value")?,
        })
    }

    /// Decodes the record into a ledger event.
    ///
    /// # Errors
    /// Returns an error for unknown event types and unparsable amounts.
    pub fn into_event(self) -> Result<LiquidityEvent, DomainError> {
        let kind = EventKind::from_str(&self.event_type)?;

        let liquidity = match kind {
            EventKind::Mint | EventKind::Burn => match self.liquidity.as_deref() {
                Some(raw) => TokenAmount::parse("liquidity", raw)?,
                None => return Err(DomainError::malformed("liquidity", "NULL")),
            },
            EventKind::Collect => TokenAmount::zero(),
        };

        Ok(LiquidityEvent {
            kind,
            time: self.time,
            liquidity,
            token_a: parse_decimal("token_a", self.token_a.as_deref())?,
            token_b: parse_decimal("token_b", self.token_b.as_deref())?,
            total_usd_value: parse_decimal("total_usd_value", Some(&self.total_usd_value))?,
        })
    }
}

/// Parses an optional numeric column; `NULL` reads as zero.
fn parse_decimal(field: &'static str, raw: Option<&str>) -> Result<Decimal, DomainError> {
    match raw {
        None => Ok(Decimal::ZERO),
        Some(s) => Decimal::from_str(s.trim()).map_err(|_| DomainError::malformed(field, s)),
    }
}

/// Converts a BIGINT id column to an unsigned id.
pub(crate) fn to_id(field: &'static str, raw: i64) -> Result<u64, DomainError> {
    u64::try_from(raw).map_err(|_| DomainError::malformed(field, raw.to_string()))
}

/// Repository for the append-only position ledger.
#[derive(Clone)]
pub struct PositionHistoryRepository {
    pool: Arc<PgPool>,
}

impl PositionHistoryRepository {
    /// Creates a new PositionHistoryRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds the raw ledger rows of one position.
    ///
    /// Rows are ordered by time, then mints before burns and collects, then
    /// insertion order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_records(
        &self,
        chain: &str,
        id: u64,
        owner: &str,
    ) -> Result<Vec<PositionHistoryRecord>, StoreError> {
        let id = i64::try_from(id).map_err(|_| DomainError::malformed("id", id.to_string()))?;
        let rows = sqlx::query(
            r#"
            SELECT seq, chain, id, owner, type, time,
                   liquidity::TEXT AS liquidity,
                   token_a::TEXT AS token_a,
                   token_b::TEXT AS token_b,
                   total_usd_value::TEXT AS total_usd_value
            FROM position_history
            WHERE chain = $1 AND id = $2 AND owner = $3
            ORDER BY time ASC,
                     CASE type WHEN 'mint' THEN 0 ELSE 1 END ASC,
                     seq ASC
            "#,
        )
        .bind(chain)
        .bind(id)
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(rows
            .iter()
            .map(PositionHistoryRecord::from_row)
            .collect::<Result<_, _>>()?)
    }

    /// Finds and decodes the ledger of one position.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn find_history(
        &self,
        chain: &str,
        id: u64,
        owner: &str,
    ) -> Result<Vec<LiquidityEvent>, StoreError> {
        let records = self.find_records(chain, id, owner).await?;
        let mut events = decode_history(records)?;
        sort_ledger(&mut events);
        debug!(chain, id, owner, events = events.len(), "Loaded position history");
        Ok(events)
    }

    /// Finds the distinct position ids an owner ever held.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn distinct_position_ids(
        &self,
        chain: &str,
        owner: &str,
    ) -> Result<Vec<u64>, StoreError> {
        let ids: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT id FROM position_history WHERE chain = $1 AND owner = $2 ORDER BY id",
        )
        .bind(chain)
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(ids
            .into_iter()
            .map(|(id,)| to_id("id", id))
            .collect::<Result<_, _>>()?)
    }
}

/// Decodes ledger rows, failing on the first undecodable one.
///
/// # Errors
/// Returns the decode error of the first bad row.
pub fn decode_history(
    records: Vec<PositionHistoryRecord>,
) -> Result<Vec<LiquidityEvent>, DomainError> {
    records
        .into_iter()
        .map(|record| {
            let (seq, id) = (record.seq, record.id);
            record.into_event().inspect_err(|e| {
                warn!(seq, id, error = %e, "Rejected ledger row");
            })
        })
        .collect()
}
