//! Recording in-memory chain used by the engine tests.

use super::{PoolReader, SettlementSwap, SwapSettlement, TokenLedger, TradingAccount};
use crate::dex::PoolPriceState;
use crate::errors::ChainError;
use ethers::types::{Address, H256, Log, TransactionReceipt, U256, U64};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Slot0(Address),
    Fee(Address),
    BalanceOf {
        token: Address,
        account: Address,
    },
    Allowance {
        token: Address,
        owner: Address,
        spender: Address,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Swap(SettlementSwap),
}

pub struct MockChain {
    pub account: Result<Address, ChainError>,
    pub settlement: Address,
    pub balance: Result<U256, ChainError>,
    pub allowance: Result<U256, ChainError>,
    pub slot0: Result<PoolPriceState, ChainError>,
    pub fee: Result<u32, ChainError>,
    pub approve_result: Result<TransactionReceipt, ChainError>,
    pub swap_result: Result<TransactionReceipt, ChainError>,
    calls: Mutex<Vec<Call>>,
}

impl MockChain {
    /// A pool at price 1 with a 0.3% fee and an account that can afford anything.
    pub fn new(account: Address, settlement: Address) -> Self {
        Self {
            account: Ok(account),
            settlement,
            balance: Ok(U256::MAX),
            allowance: Ok(U256::MAX),
            slot0: Ok(PoolPriceState::new(U256::one() << 96, 0)),
            fee: Ok(3_000),
            approve_result: Ok(mined_receipt(H256::from_low_u64_be(0xa11), vec![])),
            swap_result: Ok(mined_receipt(H256::from_low_u64_be(0x5a9), vec![])),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn approvals(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Approve { .. }))
            .count()
    }

    pub fn swaps(&self) -> Vec<SettlementSwap> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Swap(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

pub fn mined_receipt(hash: H256, logs: Vec<Log>) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: hash,
        logs,
        status: Some(U64::one()),
        ..Default::default()
    }
}

impl TradingAccount for MockChain {
    fn account(&self) -> Result<Address, ChainError> {
        self.account.clone()
    }
}

impl PoolReader for MockChain {
    async fn slot0(&self, pool: Address) -> Result<PoolPriceState, ChainError> {
        self.record(Call::Slot0(pool));
        self.slot0.clone()
    }

    async fn fee(&self, pool: Address) -> Result<u32, ChainError> {
        self.record(Call::Fee(pool));
        self.fee.clone()
    }
}

impl TokenLedger for MockChain {
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256, ChainError> {
        self.record(Call::BalanceOf { token, account });
        self.balance.clone()
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError> {
        self.record(Call::Allowance {
            token,
            owner,
            spender,
        });
        self.allowance.clone()
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TransactionReceipt, ChainError> {
        self.record(Call::Approve {
            token,
            spender,
            amount,
        });
        self.approve_result.clone()
    }
}

impl SwapSettlement for MockChain {
    fn settlement_address(&self) -> Address {
        self.settlement
    }

    async fn swap(&self, call: SettlementSwap) -> Result<TransactionReceipt, ChainError> {
        self.record(Call::Swap(call));
        self.swap_result.clone()
    }
}
