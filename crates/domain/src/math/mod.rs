//! Concentrated-liquidity fee accounting.

pub mod fee_growth;

pub use fee_growth::{FeeGrowth, fee_growth_inside, fees_earned};
