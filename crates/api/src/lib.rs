//! REST API server and endpoints.
//!
//! This crate serves read-only statistics for liquidity positions:
//! - Pools and live positions of an account
//! - Per-position deposited value, collected fees and fees to claim
//! - OpenAPI documentation

/// Prelude module for convenient imports.
pub mod prelude;

/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// OpenAPI documentation.
pub mod openapi;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Service layer for API operations.
pub mod services;
/// Application state.
pub mod state;

#[cfg(test)]
mod testing;

pub use error::{ApiError, ConfigError};
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig, connect_state};
pub use services::{FeeQuoter, PoolFeeQuoter, PositionStatsService, QuoteError, StatsConfig};
pub use state::{AppState, Network};
