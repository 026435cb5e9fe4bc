use crate::token::TokenAmount;
use primitive_types::U256;

/// Pair of per-token fee growth accumulators in Q64.64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeGrowth {
    pub a: u128,
    pub b: u128,
}

impl FeeGrowth {
    pub fn new(a: u128, b: u128) -> Self {
        Self { a, b }
    }

    fn wrapping_sub(self, other: Self) -> Self {
        Self {
            a: self.a.wrapping_sub(other.a),
            b: self.b.wrapping_sub(other.b),
        }
    }
}

/// Fee growth accrued inside `[tick_lower, tick_upper)`.
///
/// fee_growth_inside = global - below(lower) - above(upper)
/// where the outside values flip meaning depending on which side of the
/// boundary the current tick sits. All arithmetic wraps, matching on-chain
/// accumulators.
pub fn fee_growth_inside(
    tick_current: i32,
    tick_lower: i32,
    tick_upper: i32,
    global: FeeGrowth,
    lower_outside: FeeGrowth,
    upper_outside: FeeGrowth,
) -> FeeGrowth {
    let below = if tick_current >= tick_lower {
        lower_outside
    } else {
        global.wrapping_sub(lower_outside)
    };

    let above = if tick_current < tick_upper {
        upper_outside
    } else {
        global.wrapping_sub(upper_outside)
    };

    global.wrapping_sub(below).wrapping_sub(above)
}

/// Fees earned by `liquidity` since the last checkpoint.
/// fees = liquidity * (inside - inside_last) >> 64
pub fn fees_earned(liquidity: u128, inside: u128, inside_last: u128) -> TokenAmount {
    let delta = U256::from(inside.wrapping_sub(inside_last));
    TokenAmount((U256::from(liquidity) * delta) >> 64)
}
