//! Chain capabilities the engine depends on.
//!
//! The engine never builds contract handles itself; it is handed something
//! implementing these traits. [`crate::dex::EthersGateway`] is the live
//! implementation.

use crate::dex::PoolPriceState;
use crate::errors::ChainError;
use ethers::types::{Address, TransactionReceipt, U256};
use std::future::Future;

#[cfg(test)]
pub(crate) mod mock;

/// The account that signs and pays for transactions.
pub trait TradingAccount {
    fn account(&self) -> Result<Address, ChainError>;
}

/// Read access to a Uniswap V3 pool.
pub trait PoolReader {
    fn slot0(
        &self,
        pool: Address,
    ) -> impl Future<Output = Result<PoolPriceState, ChainError>> + Send;

    /// Fee tier in hundredths of a basis point (3000 = 0.3%).
    fn fee(&self, pool: Address) -> impl Future<Output = Result<u32, ChainError>> + Send;
}

/// ERC-20 reads and approvals on behalf of the trading account.
pub trait TokenLedger {
    fn balance_of(
        &self,
        token: Address,
        account: Address,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send;

    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send;

    /// Submit `approve(spender, amount)` and wait until it is mined.
    fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TransactionReceipt, ChainError>> + Send;
}

/// Arguments of the settlement contract's `swap` entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementSwap {
    pub pool: Address,
    pub recipient: Address,
    pub zero_for_one: bool,
    pub sqrt_price_limit_x96: U256,
    pub amount_specified: U256,
    pub pay0: U256,
    pub pay1: U256,
}

/// Helper contract that pays the pool and triggers its swap.
pub trait SwapSettlement {
    /// Spender that must hold the input-token allowance.
    fn settlement_address(&self) -> Address;

    /// Submit the swap and wait until it is mined.
    fn swap(
        &self,
        call: SettlementSwap,
    ) -> impl Future<Output = Result<TransactionReceipt, ChainError>> + Send;
}

/// Everything [`crate::engine::SwapEngine`] needs from the chain.
pub trait SwapGateway: TradingAccount + PoolReader + TokenLedger + SwapSettlement {}

impl<T> SwapGateway for T where T: TradingAccount + PoolReader + TokenLedger + SwapSettlement {}
