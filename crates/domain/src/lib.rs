//! Domain model for liquidity position accounting.
//!
//! - Ledger events and their canonical ordering
//! - The position accumulator that folds a ledger into aggregate state
//! - Live position snapshots and pool models for unclaimed-fee quotes
//! - Report types returned by the API

/// Prelude module for convenient imports.
pub mod prelude;

/// Position accumulator.
pub mod account;
/// Domain errors.
pub mod error;
/// Ledger events.
pub mod event;
/// Fee growth math.
pub mod math;
/// Pool state used for fee quotes.
pub mod pool;
/// Report types.
pub mod report;
/// Live position snapshots.
pub mod snapshot;
/// Token metadata and raw amounts.
pub mod token;

pub use account::{PositionAccount, PositionAccumulator, fold};
pub use error::DomainError;
pub use event::{EventKind, LiquidityEvent, sort_ledger};
pub use report::{FeeQuote, FeesToClaim, PositionReport, PositionStatsEntry};
pub use snapshot::LivePositionSnapshot;
