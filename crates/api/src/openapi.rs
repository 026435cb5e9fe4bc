//! OpenAPI documentation configuration.
//!
//! Provides OpenAPI spec generation using utoipa.

use crate::handlers;
use crate::models::{
    AccountResponse, CollectedFeesSchema, ErrorResponse, FeesToClaimSchema, HealthResponse,
    PositionStatsSchema,
};
use utoipa::OpenApi;

/// OpenAPI documentation structure.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LP Position Stats API",
        description = "Read-only statistics for concentrated liquidity positions: \
                       deposited value, collected fees and fees still to claim.",
        license(name = "MIT OR Apache-2.0"),
        contact(
            name = "Joaquín Béjar García",
            email = "jb@taunais.com"
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Account", description = "Per-account positions and stats")
    ),
    paths(
        handlers::health_check,
        handlers::get_account,
        handlers::pools_positions_in,
        handlers::list_positions,
        handlers::positions_stats,
    ),
    components(
        schemas(
            HealthResponse,
            AccountResponse,
            ErrorResponse,
            CollectedFeesSchema,
            FeesToClaimSchema,
            PositionStatsSchema,
        )
    )
)]
pub struct ApiDoc;

/// Returns the OpenAPI JSON specification.
#[must_use]
pub fn openapi_json() -> String {
    ApiDoc::openapi().to_json().unwrap_or_default()
}

/// Returns the pretty-printed OpenAPI JSON specification.
#[must_use]
pub fn openapi_pretty_json() -> String {
    ApiDoc::openapi().to_pretty_json().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let json = openapi_json();
        assert!(!json.is_empty());
        assert!(json.contains("LP Position Stats API"));
        assert!(json.contains("/v2/account/{account}/poolsPositionsIn"));
    }

    #[test]
    fn test_openapi_pretty_json() {
        let json = openapi_pretty_json();
        assert!(json.contains("positions-stats"));
        assert!(json.contains('\n'));
    }
}
