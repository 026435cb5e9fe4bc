use crate::error::DomainError;
use crate::math::{FeeGrowth, fee_growth_inside, fees_earned};
use crate::snapshot::LivePositionSnapshot;
use crate::token::{Token, TokenAmount};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fee growth recorded on the far side of an initialized tick, Q64.64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFeeGrowth {
    pub fee_growth_outside_a_x64: u128,
    pub fee_growth_outside_b_x64: u128,
}

impl From<TickFeeGrowth> for FeeGrowth {
    fn from(t: TickFeeGrowth) -> Self {
        FeeGrowth::new(t.fee_growth_outside_a_x64, t.fee_growth_outside_b_x64)
    }
}

/// Current state of a concentrated-liquidity pool, enough to quote fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolModel {
    pub id: u64,
    pub chain: String,
    pub token_a: Token,
    pub token_b: Token,
    pub tick_current: i32,
    pub fee_growth_global_a_x64: u128,
    pub fee_growth_global_b_x64: u128,
    /// Initialized ticks. Missing ticks have zero fee growth outside.
    pub ticks: BTreeMap<i32, TickFeeGrowth>,
}

/// Fees a position could claim right now, in token units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwedFees {
    pub fees_a: Decimal,
    pub fees_b: Decimal,
}

impl PoolModel {
    fn global(&self) -> FeeGrowth {
        FeeGrowth::new(self.fee_growth_global_a_x64, self.fee_growth_global_b_x64)
    }

    fn outside(&self, tick: i32) -> FeeGrowth {
        self.ticks.get(&tick).copied().unwrap_or_default().into()
    }

    /// Computes the unclaimed fees of `position` against the pool's current
    /// fee growth.
    pub fn fees_owed(&self, position: &LivePositionSnapshot) -> Result<OwedFees, DomainError> {
        if position.tick_lower >= position.tick_upper {
            return Err(DomainError::InvalidTickRange {
                lower: position.tick_lower,
                upper: position.tick_upper,
            });
        }

        let inside = fee_growth_inside(
            self.tick_current,
            position.tick_lower,
            position.tick_upper,
            self.global(),
            self.outside(position.tick_lower),
            self.outside(position.tick_upper),
        );

        let earned_a = fees_earned(
            position.liquidity,
            inside.a,
            position.fee_growth_inside_a_last_x64,
        );
        let earned_b = fees_earned(
            position.liquidity,
            inside.b,
            position.fee_growth_inside_b_last_x64,
        );

        let total_a = TokenAmount(earned_a.as_u256() + U256::from(position.fees_owed_a));
        let total_b = TokenAmount(earned_b.as_u256() + U256::from(position.fees_owed_b));

        Ok(OwedFees {
            fees_a: total_a.to_decimal(self.token_a.decimals)?,
            fees_b: total_b.to_decimal(self.token_b.decimals)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const Q64: u128 = 1 << 64;

    fn pool() -> PoolModel {
        let mut ticks = BTreeMap::new();
        ticks.insert(
            -100,
            TickFeeGrowth {
                fee_growth_outside_a_x64: 2 * Q64,
                fee_growth_outside_b_x64: Q64,
            },
        );
        PoolModel {
            id: 1,
            chain: "wax".to_string(),
            token_a: Token::new("WAX", 8),
            token_b: Token::new("USDT", 4),
            tick_current: 0,
            fee_growth_global_a_x64: 10 * Q64,
            fee_growth_global_b_x64: 4 * Q64,
            ticks,
        }
    }

    fn position(liquidity: u128) -> LivePositionSnapshot {
        LivePositionSnapshot {
            id: 9,
            owner: "alice".to_string(),
            pool: 1,
            tick_lower: -100,
            tick_upper: 100,
            liquidity,
            fee_growth_inside_a_last_x64: 3 * Q64,
            fee_growth_inside_b_last_x64: Q64,
            fees_owed_a: 5,
            fees_owed_b: 0,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_fees_owed_in_range() {
        // inside a = 10 - 2 - 0 = 8, earned = 1000 * (8 - 3) = 5000 (+5 owed)
        // inside b = 4 - 1 - 0 = 3, earned = 1000 * (3 - 1) = 2000
        let owed = pool().fees_owed(&position(1_000)).unwrap();
        assert_eq!(owed.fees_a, dec!(0.00005005));
        assert_eq!(owed.fees_b, dec!(0.2));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let mut p = position(1);
        p.tick_lower = 100;
        p.tick_upper = -100;
        assert!(matches!(
            pool().fees_owed(&p),
            Err(DomainError::InvalidTickRange { .. })
        ));
    }
}
