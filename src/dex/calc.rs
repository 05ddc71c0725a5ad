use crate::dex::state::PoolPriceState;
use crate::models::BPS_DENOMINATOR;
use ethers::types::{U256, U512};

/// Fee tiers are quoted in hundredths of a basis point.
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Uniswap V3 `TickMath.MIN_SQRT_RATIO` (4295128739).
pub const MIN_SQRT_RATIO: U256 = U256([4_295_128_739, 0, 0, 0]);
/// Uniswap V3 `TickMath.MAX_SQRT_RATIO`
/// (1461446703485210103287273052203988822378723970342).
pub const MAX_SQRT_RATIO: U256 = U256([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0]);

/// Q96 squared: `price = sqrtPriceX96^2 >> 192`.
const Q192_SHIFT: usize = 192;

/// First-order output estimate for an exact-input swap.
///
/// Applies the current spot price to the whole input and deducts the pool fee.
/// Liquidity depth is ignored, so large trades against thin pools will be
/// overestimated; the pool computes the real amount on execution.
pub fn estimate_amount_out(
    amount_in: U256,
    state: &PoolPriceState,
    zero_for_one: bool,
    fee_pips: u32,
) -> U256 {
    if !state.is_initialized() || amount_in.is_zero() {
        return U256::zero();
    }
    let sqrt = U512::from(state.sqrt_price_x96);
    let price_x192 = sqrt * sqrt;
    let amount = U512::from(amount_in);

    let raw_out = if zero_for_one {
        // token0 in: out = amount * price
        match amount.checked_mul(price_x192) {
            Some(scaled) => scaled >> Q192_SHIFT,
            None => return U256::MAX,
        }
    } else {
        // token1 in: out = amount / price
        (amount << Q192_SHIFT) / price_x192
    };

    let fee_kept = U512::from(FEE_DENOMINATOR.saturating_sub(fee_pips));
    let out = match raw_out.checked_mul(fee_kept) {
        Some(v) => v / U512::from(FEE_DENOMINATOR),
        None => return U256::MAX,
    };
    U256::try_from(out).unwrap_or(U256::MAX)
}

/// Worst acceptable sqrt price after the swap.
///
/// Selling token0 pushes the price down, so the limit sits below the current
/// price; selling token1 pushes it up. The result stays inside the pool's
/// valid open range and never crosses the current price.
pub fn sqrt_price_limit(state: &PoolPriceState, zero_for_one: bool, slippage_bps: u32) -> U256 {
    let current = state.sqrt_price_x96;
    let denominator = U256::from(BPS_DENOMINATOR);
    if zero_for_one {
        let factor = U256::from(BPS_DENOMINATOR.saturating_sub(slippage_bps));
        let limit = current * factor / denominator;
        limit.max(MIN_SQRT_RATIO + U256::one()).min(current)
    } else {
        let factor = U256::from(BPS_DENOMINATOR + slippage_bps);
        let limit = current * factor / denominator;
        limit.min(MAX_SQRT_RATIO - U256::one()).max(current)
    }
}

/// Amounts the settlement contract forwards to the pool as `(pay0, pay1)`.
pub fn pay_amounts(amount_in: U256, zero_for_one: bool) -> (U256, U256) {
    if zero_for_one {
        (amount_in, U256::zero())
    } else {
        (U256::zero(), amount_in)
    }
}
