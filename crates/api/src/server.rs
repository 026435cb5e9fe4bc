//! Server configuration and startup.

use crate::error::ConfigError;
use crate::routes::create_router;
use crate::services::{PoolFeeQuoter, PositionStatsService, StatsConfig};
use crate::state::{AppState, Network};
use axum::Router;
use lp_stats_data::{Database, RedisSnapshotCache, StoreError};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Chain served by this instance.
    pub network: String,
    /// PostgreSQL connection string of the indexer database.
    pub database_url: String,
    /// Redis connection string of the live position cache.
    pub redis_url: String,
    /// Maximum pooled database connections.
    pub db_max_connections: u32,
    /// Positions processed concurrently per account report.
    pub stats_concurrency: usize,
    /// Per-position time budget in milliseconds.
    pub position_timeout_ms: u64,
    /// Enable permissive CORS.
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            network: "wax".to_string(),
            database_url: "postgres://localhost/lp_stats".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            db_max_connections: 10,
            stats_concurrency: 8,
            position_timeout_ms: 10_000,
            cors_enabled: true,
        }
    }
}

fn env_var(var: &'static str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env_var(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

impl ServerConfig {
    /// Loads the configuration from environment variables.
    ///
    /// `DATABASE_URL` is required. Every other variable falls back to its
    /// default.
    ///
    /// # Errors
    /// Returns an error if `DATABASE_URL` is missing or a value is unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_var("API_HOST").unwrap_or(defaults.host),
            port: parse_var("API_PORT", defaults.port)?,
            network: env_var("NETWORK").unwrap_or(defaults.network),
            database_url: env_var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            redis_url: env_var("REDIS_URL").unwrap_or(defaults.redis_url),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            stats_concurrency: parse_var("STATS_CONCURRENCY", defaults.stats_concurrency)?,
            position_timeout_ms: parse_var("POSITION_TIMEOUT_MS", defaults.position_timeout_ms)?,
            cors_enabled: parse_var("CORS_ENABLED", defaults.cors_enabled)?,
        })
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    /// Returns an error if host and port do not form a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.host, self.port);
        value.parse().map_err(|_| ConfigError::Invalid {
            var: "API_HOST",
            value,
        })
    }

    /// Stats fan-out settings.
    #[must_use]
    pub fn stats_config(&self) -> StatsConfig {
        StatsConfig {
            concurrency: self.stats_concurrency.max(1),
            position_timeout: Duration::from_millis(self.position_timeout_ms),
        }
    }
}

/// Builds the application state over Postgres and Redis.
///
/// # Errors
/// Returns an error if either store cannot be reached.
pub async fn connect_state(config: &ServerConfig) -> Result<AppState, StoreError> {
    let database = Database::connect(&config.database_url, config.db_max_connections).await?;
    let cache = RedisSnapshotCache::connect(&config.redis_url).await?;
    info!(network = %config.network, "Connected to database and cache");

    let ledger = Arc::new(database.clone());
    let snapshots = Arc::new(cache);
    let quoter = Arc::new(PoolFeeQuoter::new(Arc::new(database)));
    let stats = PositionStatsService::new(
        ledger.clone(),
        snapshots.clone(),
        quoter,
        config.stats_config(),
    );

    Ok(AppState::new(
        Network::new(&config.network),
        ledger,
        snapshots,
        stats,
    ))
}

/// API server.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Connects to the stores named in `config` and creates the server.
    ///
    /// # Errors
    /// Returns an error if either store cannot be reached.
    pub async fn connect(config: ServerConfig) -> Result<Self, StoreError> {
        let state = connect_state(&config).await?;
        Ok(Self::new(config, state))
    }

    /// Returns the application router.
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), self.config.cors_enabled)
    }

    /// Runs the server until Ctrl-C.
    ///
    /// # Errors
    /// Returns an error if the address is invalid or the listener fails.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, network = %self.state.network, "Starting API server");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
