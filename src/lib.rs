//! Swap quoting and execution against Uniswap V3 style pools.
//!
//! [`engine::SwapEngine`] drives the sequence; the chain is reached only
//! through the capability traits in [`chain`].

pub mod amount;
pub mod chain;
pub mod config;
pub mod dex;
pub mod engine;
pub mod errors;
pub mod models;
pub mod utils;
