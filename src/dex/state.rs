use ethers::types::U256;

/// Point-in-time snapshot of a Uniswap V3 pool's `slot0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolPriceState {
    /// Current sqrt(price1/price0) in Q96 (Uniswap V3 `slot0.sqrtPriceX96`).
    pub sqrt_price_x96: U256,
    /// Current tick index (Uniswap V3 `slot0.tick`).
    pub tick: i32,
}

impl PoolPriceState {
    pub fn new(sqrt_price_x96: U256, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
        }
    }

    /// A zero sqrt price means `initialize` was never called on the pool.
    pub fn is_initialized(&self) -> bool {
        !self.sqrt_price_x96.is_zero()
    }

    /// Raw token1/token0 price as f64, for logging only.
    pub fn spot_price(&self) -> f64 {
        let sqrt = q96_to_f64(&self.sqrt_price_x96);
        sqrt * sqrt
    }
}

fn q96_to_f64(q96: &U256) -> f64 {
    // Go through the decimal string so values above u128 keep their magnitude
    let int_val = q96.to_string().parse::<f64>().unwrap_or(0.0);
    int_val / 2.0_f64.powi(96)
}
