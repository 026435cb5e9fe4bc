//! Pool repository for fee growth state.

use super::position_history_repository::to_id;
use crate::error::StoreError;
use lp_stats_domain::DomainError;
use lp_stats_domain::pool::{PoolModel, TickFeeGrowth};
use lp_stats_domain::token::Token;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Database record for a pool.
#[derive(Debug, Clone)]
pub struct PoolRecord {
    /// Chain name.
    pub chain: String,
    /// Pool id.
    pub id: i64,
    /// Token A symbol.
    pub token_a_symbol: String,
    /// Token A decimals.
    pub token_a_decimals: i16,
    /// Token B symbol.
    pub token_b_symbol: String,
    /// Token B decimals.
    pub token_b_decimals: i16,
    /// Current pool tick.
    pub tick_current: i32,
    /// Global fee growth of token A, Q64.64.
    pub fee_growth_global_a_x64: String,
    /// Global fee growth of token B, Q64.64.
    pub fee_growth_global_b_x64: String,
    /// Last indexer refresh.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PoolRecord {
    /// Creates a PoolRecord from a database row.
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            chain: row.try_get("chain")?,
            id: row.try_get("id")?,
            token_a_symbol: row.try_get("token_a_symbol")?,
            token_a_decimals: row.try_get("token_a_decimals")?,
            token_b_symbol: row.try_get("token_b_symbol")?,
            token_b_decimals: row.try_get("token_b_decimals")?,
            tick_current: row.try_get("tick_current")?,
            fee_growth_global_a_x64: row.try_get("fee_growth_global_a_x64")?,
            fee_growth_global_b_x64: row.try_get("fee_growth_global_b_x64")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Database record for an initialized tick.
#[derive(Debug, Clone)]
pub struct TickRecord {
    /// Tick index.
    pub tick: i32,
    /// Token A fee growth outside, Q64.64.
    pub fee_growth_outside_a_x64: String,
    /// Token B fee growth outside, Q64.64.
    pub fee_growth_outside_b_x64: String,
}

impl TickRecord {
    /// Creates a TickRecord from a database row.
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            tick: row.try_get("tick")?,
            fee_growth_outside_a_x64: row.try_get("fee_growth_outside_a_x64")?,
            fee_growth_outside_b_x64: row.try_get("fee_growth_outside_b_x64")?,
        })
    }

    fn into_fee_growth(self) -> Result<(i32, TickFeeGrowth), DomainError> {
        Ok((
            self.tick,
            TickFeeGrowth {
                fee_growth_outside_a_x64: parse_x64(
                    "fee_growth_outside_a_x64",
                    &self.fee_growth_outside_a_x64,
                )?,
                fee_growth_outside_b_x64: parse_x64(
                    "fee_growth_outside_b_x64",
                    &self.fee_growth_outside_b_x64,
                )?,
            },
        ))
    }
}

fn parse_x64(field: &'static str, raw: &str) -> Result<u128, DomainError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::malformed(field, raw))
}

fn parse_decimals(field: &'static str, raw: i16) -> Result<u8, DomainError> {
    u8::try_from(raw).map_err(|_| DomainError::malformed(field, raw.to_string()))
}

/// Assembles a pool model from its record and initialized ticks.
///
/// # Errors
/// Returns an error if a fee growth value or token decimals are malformed.
pub fn build_pool_model(
    record: PoolRecord,
    ticks: Vec<TickRecord>,
) -> Result<PoolModel, DomainError> {
    let ticks = ticks
        .into_iter()
        .map(TickRecord::into_fee_growth)
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(PoolModel {
        id: to_id("pool", record.id)?,
        token_a: Token::new(
            record.token_a_symbol,
            parse_decimals("token_a_decimals", record.token_a_decimals)?,
        ),
        token_b: Token::new(
            record.token_b_symbol,
            parse_decimals("token_b_decimals", record.token_b_decimals)?,
        ),
        chain: record.chain,
        tick_current: record.tick_current,
        fee_growth_global_a_x64: parse_x64(
            "fee_growth_global_a_x64",
            &record.fee_growth_global_a_x64,
        )?,
        fee_growth_global_b_x64: parse_x64(
            "fee_growth_global_b_x64",
            &record.fee_growth_global_b_x64,
        )?,
        ticks,
    })
}

/// Repository for pool and tick reads.
#[derive(Clone)]
pub struct PoolRepository {
    pool: Arc<PgPool>,
}

impl PoolRepository {
    /// Creates a new PoolRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a pool by chain and id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_id(
        &self,
        chain: &str,
        id: i64,
    ) -> Result<Option<PoolRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT chain, id, token_a_symbol, token_a_decimals, token_b_symbol,
                   token_b_decimals, tick_current,
                   fee_growth_global_a_x64::TEXT AS fee_growth_global_a_x64,
                   fee_growth_global_b_x64::TEXT AS fee_growth_global_b_x64,
                   updated_at
            FROM pools
            WHERE chain = $1 AND id = $2
            "#,
        )
        .bind(chain)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;
        row.as_ref().map(PoolRecord::from_row).transpose()
    }

    /// Finds the initialized ticks of a pool.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_ticks(
        &self,
        chain: &str,
        pool_id: i64,
    ) -> Result<Vec<TickRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT tick,
                   fee_growth_outside_a_x64::TEXT AS fee_growth_outside_a_x64,
                   fee_growth_outside_b_x64::TEXT AS fee_growth_outside_b_x64
            FROM ticks
            WHERE chain = $1 AND pool_id = $2
            ORDER BY tick ASC
            "#,
        )
        .bind(chain)
        .bind(pool_id)
        .fetch_all(self.pool.as_ref())
        .await?;
        rows.iter().map(TickRecord::from_row).collect()
    }

    /// Loads a pool with its ticks as a fee quoting model.
    ///
    /// # Errors
    /// Returns an error if a query fails or the stored state is malformed.
    pub async fn find_model(&self, chain: &str, id: u64) -> Result<Option<PoolModel>, StoreError> {
        let id = i64::try_from(id).map_err(|_| DomainError::malformed("pool", id.to_string()))?;
        let Some(record) = self.find_by_id(chain, id).await? else {
            return Ok(None);
        };
        let ticks = self.find_ticks(chain, id).await?;
        Ok(Some(build_pool_model(record, ticks)?))
    }
}
