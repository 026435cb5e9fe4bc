//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Account routes, nested under `/v2/account`.
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/{account}", get(handlers::get_account))
        .route(
            "/{account}/poolsPositionsIn",
            get(handlers::pools_positions_in),
        )
        .route("/{account}/positions", get(handlers::list_positions))
        .route("/{account}/positions-stats", get(handlers::positions_stats))
}

/// Creates the application router.
pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(handlers::openapi_spec))
        .nest("/v2/account", account_routes())
        .layer(TraceLayer::new_for_http());

    let router = if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeLedger, FakePools, FakeSnapshots, app_state, at, snapshot, wax_pool,
    };
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use lp_stats_domain::LiquidityEvent;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn router(ledger: FakeLedger, snapshots: FakeSnapshots, pools: FakePools) -> Router {
        create_router(app_state(ledger, snapshots, pools), false)
    }

    fn empty_router() -> Router {
        router(
            FakeLedger::default(),
            FakeSnapshots::default(),
            FakePools::default(),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(empty_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["network"], "wax");
    }

    #[tokio::test]
    async fn test_account_placeholder() {
        let (status, body) = get_json(empty_router(), "/v2/account/alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "account": "alice", "todo": "some account data" })
        );
    }

    #[tokio::test]
    async fn test_pools_positions_in() {
        let ledger = FakeLedger::default().with_pools("wax", "alice", vec![3, 5]);
        let app = router(ledger, FakeSnapshots::default(), FakePools::default());

        let (status, body) = get_json(app.clone(), "/v2/account/alice/poolsPositionsIn").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([3, 5]));

        let (_, body) = get_json(app, "/v2/account/bob/poolsPositionsIn").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_positions_filters_by_owner() {
        let mut kept = snapshot(7, "alice", 3);
        kept.extra.insert("status".to_string(), json!("open"));
        let snapshots = FakeSnapshots::default()
            .with_snapshot("wax", kept)
            .with_snapshot("wax", snapshot(8, "bob", 3))
            .with_snapshot("eos", snapshot(9, "alice", 3));
        let app = router(FakeLedger::default(), snapshots, FakePools::default());

        let (status, body) = get_json(app, "/v2/account/alice/positions").await;
        assert_eq!(status, StatusCode::OK);
        let positions = body.as_array().unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0]["id"], 7);
        assert_eq!(positions[0]["liquidity"], "1000");
        assert_eq!(positions[0]["status"], "open");
    }

    #[tokio::test]
    async fn test_positions_are_returned_as_published() {
        let minimal = json!({ "id": 7, "owner": "alice", "pool": 3, "status": "opening" });
        let numeric = json!({
            "id": 8,
            "owner": "alice",
            "pool": 3,
            "tickLower": -100,
            "tickUpper": 100,
            "liquidity": 1000,
            "feeGrowthInsideALastX64": "0",
            "feeGrowthInsideBLastX64": "0"
        });
        let snapshots = FakeSnapshots::default()
            .with_entry("wax", minimal.clone())
            .with_entry("wax", numeric.clone())
            .with_entry("wax", json!({ "id": 9, "owner": "bob" }));
        let app = router(FakeLedger::default(), snapshots, FakePools::default());

        let (status, body) = get_json(app, "/v2/account/alice/positions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([minimal, numeric]));
    }

    #[tokio::test]
    async fn test_positions_stats() {
        let ledger = FakeLedger::default()
            .with_history(
                "wax",
                1,
                "alice",
                vec![
                    LiquidityEvent::mint(at(1), 100u64, dec!(500)),
                    LiquidityEvent::collect(at(2), dec!(1), dec!(2), dec!(3)),
                    LiquidityEvent::burn(at(3), 100u64, dec!(520)),
                ],
            )
            .with_history(
                "wax",
                2,
                "alice",
                vec![LiquidityEvent::mint(at(5), 1_000u64, dec!(60.12345))],
            );
        let snapshots = FakeSnapshots::default().with_snapshot("wax", snapshot(2, "alice", 3));
        let app = router(ledger, snapshots, FakePools::default().with_pool(wax_pool(3)));

        let (status, body) = get_json(app, "/v2/account/alice/positions-stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {
                    "id": 1,
                    "depositedUSDTotal": -23.0,
                    "closed": true,
                    "collectedFees": { "tokenA": 1.0, "tokenB": 2.0, "inUSD": 3.0 },
                    "feesToClaim": {}
                },
                {
                    "id": 2,
                    "depositedUSDTotal": 60.1235,
                    "closed": false,
                    "collectedFees": { "tokenA": 0.0, "tokenB": 0.0, "inUSD": 0.0 },
                    "feesToClaim": { "feesA": "0.00005005", "feesB": "0.2" }
                }
            ])
        );
    }

    #[tokio::test]
    async fn test_store_outage_is_503() {
        let app = router(
            FakeLedger::default().down(),
            FakeSnapshots::default().down(),
            FakePools::default(),
        );

        for uri in [
            "/v2/account/alice/poolsPositionsIn",
            "/v2/account/alice/positions",
            "/v2/account/alice/positions-stats",
        ] {
            let (status, body) = get_json(app.clone(), uri).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
            assert_eq!(body["code"], 503);
        }
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let (status, body) = get_json(empty_router(), "/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/v2/account/{account}/positions-stats"].is_object());
    }
}
