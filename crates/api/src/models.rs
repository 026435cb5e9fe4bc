//! API request/response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Chain this instance serves.
    pub network: String,
}

/// Account summary placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    /// Account name.
    pub account: String,
    /// Placeholder until account data is served.
    pub todo: String,
}

impl AccountResponse {
    /// Placeholder response for `account`.
    #[must_use]
    pub fn placeholder(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            todo: "some account data".to_string(),
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable message.
    pub error: String,
    /// HTTP status code.
    pub code: u16,
}

/// Collected fees of a position, as serialized in stats entries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectedFeesSchema {
    #[serde(rename = "tokenA")]
    pub token_a: f64,
    #[serde(rename = "tokenB")]
    pub token_b: f64,
    #[serde(rename = "inUSD")]
    pub in_usd: f64,
}

/// Unclaimed fee quote; an empty object when no quote is available.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeesToClaimSchema {
    #[serde(rename = "feesA", skip_serializing_if = "Option::is_none")]
    pub fees_a: Option<String>,
    #[serde(rename = "feesB", skip_serializing_if = "Option::is_none")]
    pub fees_b: Option<String>,
}

/// One entry of the positions-stats response.
///
/// Entries for positions that could not be processed carry only `id` and
/// `error`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionStatsSchema {
    pub id: u64,
    #[serde(rename = "depositedUSDTotal")]
    pub deposited_usd_total: Option<f64>,
    pub closed: Option<bool>,
    pub collected_fees: Option<CollectedFeesSchema>,
    pub fees_to_claim: Option<FeesToClaimSchema>,
    pub fees_error: Option<String>,
    pub error: Option<String>,
}
