//! Uniswap V3 pool integration: price math, receipts and the ethers client.

pub mod calc;
pub mod client;
pub mod receipt;
pub mod state;

pub use calc::{
    FEE_DENOMINATOR, MAX_SQRT_RATIO, MIN_SQRT_RATIO, estimate_amount_out, pay_amounts,
    sqrt_price_limit,
};
pub use client::EthersGateway;
pub use state::PoolPriceState;
