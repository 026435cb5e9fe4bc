//! Request handlers.
//!
//! Every account endpoint queries the chain configured in [`AppState`].

use crate::error::ApiError;
use crate::models::{AccountResponse, ErrorResponse, HealthResponse, PositionStatsSchema};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use lp_stats_data::owned_by;
use lp_stats_domain::PositionStatsEntry;
use tracing::{debug, instrument};

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        network: state.network.to_string(),
    })
}

/// Serves the OpenAPI document.
pub async fn openapi_spec() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        crate::openapi::openapi_json(),
    )
}

/// Account summary.
#[utoipa::path(
    get,
    path = "/v2/account/{account}",
    tag = "Account",
    params(("account" = String, Path, description = "Account name")),
    responses(
        (status = 200, description = "Account summary", body = AccountResponse)
    )
)]
pub async fn get_account(Path(account): Path<String>) -> Json<AccountResponse> {
    Json(AccountResponse::placeholder(account))
}

/// Pools the account holds positions in.
#[utoipa::path(
    get,
    path = "/v2/account/{account}/poolsPositionsIn",
    tag = "Account",
    params(("account" = String, Path, description = "Account name")),
    responses(
        (status = 200, description = "Distinct pool ids", body = [u64]),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(network = %state.network))]
pub async fn pools_positions_in(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<Vec<u64>>, ApiError> {
    let pools = state
        .ledger
        .distinct_pools(state.network.name(), &account)
        .await?;
    debug!(pools = pools.len(), "Listed pools");
    Ok(Json(pools))
}

/// Live positions of the account.
#[utoipa::path(
    get,
    path = "/v2/account/{account}/positions",
    tag = "Account",
    params(("account" = String, Path, description = "Account name")),
    responses(
        (status = 200, description = "Cached live positions owned by the account, as published"),
        (status = 503, description = "Cache unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(network = %state.network))]
pub async fn list_positions(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let entries = state.snapshots.raw_positions(state.network.name()).await?;
    let positions = owned_by(entries, &account);
    debug!(positions = positions.len(), "Listed live positions");
    Ok(Json(positions))
}

/// Stats of every position the account ever held.
#[utoipa::path(
    get,
    path = "/v2/account/{account}/positions-stats",
    tag = "Account",
    params(("account" = String, Path, description = "Account name")),
    responses(
        (status = 200, description = "Per-position stats", body = [PositionStatsSchema]),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(network = %state.network))]
pub async fn positions_stats(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<Vec<PositionStatsEntry>>, ApiError> {
    let entries = state
        .stats
        .account_report(state.network.name(), &account)
        .await?;
    Ok(Json(entries))
}
