//! Live position snapshots as published by the indexer cache.

use serde::{Deserialize, Serialize};

/// Current on-chain state of an open position.
///
/// Fields the accounting does not use are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePositionSnapshot {
    /// Position id.
    pub id: u64,
    /// Owning account.
    pub owner: String,
    /// Pool the position belongs to.
    pub pool: u64,
    /// Lower tick of the range.
    pub tick_lower: i32,
    /// Upper tick of the range.
    pub tick_upper: i32,
    /// Position liquidity.
    #[serde(with = "u128_string")]
    pub liquidity: u128,
    /// Fee growth inside the range for token A at the last update, Q64.64.
    #[serde(with = "u128_string")]
    pub fee_growth_inside_a_last_x64: u128,
    /// Fee growth inside the range for token B at the last update, Q64.64.
    #[serde(with = "u128_string")]
    pub fee_growth_inside_b_last_x64: u128,
    /// Token A fees already credited to the position, raw units.
    #[serde(default, with = "u128_string")]
    pub fees_owed_a: u128,
    /// Token B fees already credited to the position, raw units.
    #[serde(default, with = "u128_string")]
    pub fees_owed_b: u128,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Big integers travel as decimal strings; plain JSON numbers are accepted
/// when they fit a `u64`.
pub(crate) mod u128_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid integer `{s}`"))),
            Raw::Num(n) => Ok(u128::from(n)),
        }
    }
}
