//! Redis-backed live position cache.
//!
//! The indexer publishes every open position of a chain as one JSON array
//! under `positions_{chain}`. Entries are kept as published; they are only
//! decoded into [`LivePositionSnapshot`] when fees are quoted.

use crate::error::StoreError;
use crate::store::SnapshotStore;
use async_trait::async_trait;
use lp_stats_domain::LivePositionSnapshot;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde_json::Value;
use tracing::{debug, warn};

/// Cache key holding the positions of `chain`.
#[must_use]
pub fn positions_key(chain: &str) -> String {
    format!("positions_{chain}")
}

/// Parses a cached positions array without interpreting its entries.
///
/// # Errors
/// Returns an error if the payload is not a JSON array.
pub fn parse_positions(payload: &str) -> Result<Vec<Value>, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Position id of a cached entry, given as a number or a decimal string.
#[must_use]
pub fn entry_id(entry: &Value) -> Option<u64> {
    match entry.get("id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Keeps the entries whose `owner` is `owner`, unchanged.
#[must_use]
pub fn owned_by(entries: Vec<Value>, owner: &str) -> Vec<Value> {
    entries
        .into_iter()
        .filter(|entry| entry.get("owner").and_then(Value::as_str) == Some(owner))
        .collect()
}

/// Decodes cached entries into snapshots.
///
/// Entries that do not decode are skipped and logged.
pub fn decode_positions<I>(chain: &str, entries: I) -> Vec<LivePositionSnapshot>
where
    I: IntoIterator<Item = Value>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry_id(&entry);
            match serde_json::from_value(entry) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(chain, ?id, error = %e, "Skipping undecodable cached position");
                    None
                }
            }
        })
        .collect()
}

/// Snapshot store over a Redis connection.
#[derive(Clone)]
pub struct RedisSnapshotCache {
    conn: ConnectionManager,
}

impl RedisSnapshotCache {
    /// Wraps an existing connection manager.
    #[must_use]
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connects to Redis.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotCache {
    async fn raw_positions(&self, chain: &str) -> Result<Vec<Value>, StoreError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(positions_key(chain)).await?;

        match payload {
            Some(payload) => {
                let entries = parse_positions(&payload)?;
                debug!(chain, entries = entries.len(), "Loaded cached positions");
                Ok(entries)
            }
            None => {
                debug!(chain, "No cached positions");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAYLOAD: &str = r#"[
        {"id": 1, "owner": "alice", "pool": 2, "tickLower": -10, "tickUpper": 10,
         "liquidity": 100, "feeGrowthInsideALastX64": "0", "feeGrowthInsideBLastX64": "0"},
        {"id": 5, "owner": "alice", "pool": 2, "status": "opening"},
        {"id": 2, "owner": "bob", "pool": 2}
    ]"#;

    #[test]
    fn test_positions_key() {
        assert_eq!(positions_key("wax"), "positions_wax");
    }

    #[test]
    fn test_owned_entries_are_returned_as_published() {
        let entries = owned_by(parse_positions(PAYLOAD).unwrap(), "alice");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["liquidity"], json!(100));
        assert!(entries[0].get("feesOwedA").is_none());
        assert_eq!(
            entries[1],
            json!({ "id": 5, "owner": "alice", "pool": 2, "status": "opening" })
        );
    }

    #[test]
    fn test_decode_skips_incomplete_entries() {
        let positions = decode_positions("wax", parse_positions(PAYLOAD).unwrap());
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].id, 1);
        assert_eq!(positions[0].liquidity, 100);
    }

    #[test]
    fn test_entry_id() {
        assert_eq!(entry_id(&json!({ "id": 7 })), Some(7));
        assert_eq!(entry_id(&json!({ "id": "8" })), Some(8));
        assert_eq!(entry_id(&json!({ "id": -1 })), None);
        assert_eq!(entry_id(&json!({ "owner": "alice" })), None);
    }

    #[test]
    fn test_parse_positions_rejects_non_array() {
        assert!(parse_positions("{\"id\": 1}").is_err());
        assert!(parse_positions("null").is_err());
    }
}
