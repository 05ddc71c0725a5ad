use crate::chain::{PoolReader, SettlementSwap, SwapSettlement, TokenLedger, TradingAccount};
use crate::dex::state::PoolPriceState;
use crate::errors::ChainError;
use crate::models::TokenDescriptor;
use ethers::{
    contract::{ContractError, abigen},
    providers::{Middleware, ProviderError, RpcError},
    types::{Address, I256, TransactionReceipt, U256},
};
use std::sync::Arc;
use tracing::debug;

abigen!(
    UniswapV3Pool,
    r#"[
        function slot0() view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked)
        function fee() view returns (uint24)
    ]"#,
);

abigen!(
    Erc20Token,
    r#"[
        function symbol() view returns (string)
        function decimals() view returns (uint8)
        function balanceOf(address account) view returns (uint256)
        function allowance(address owner, address spender) view returns (uint256)
        function approve(address spender, uint256 amount) returns (bool)
    ]"#,
);

abigen!(
    SwapHelper,
    r#"[
        function swap(address pool, address recipient, bool zeroForOne, uint160 sqrtPriceX96, int256 amountSpecified, uint256 pay0, uint256 pay1)
    ]"#,
);

impl<M: Middleware> From<ContractError<M>> for ChainError {
    fn from(err: ContractError<M>) -> Self {
        let revert_data = err.as_revert().cloned();
        Self {
            message: err.to_string(),
            revert_data,
        }
    }
}

impl From<ProviderError> for ChainError {
    fn from(err: ProviderError) -> Self {
        let revert_data = err
            .as_error_response()
            .and_then(|resp| resp.as_revert_data());
        Self {
            message: err.to_string(),
            revert_data,
        }
    }
}

/// Chain access through an ethers middleware.
///
/// With a plain `Provider` only reads work; wrap it in a `SignerMiddleware`
/// to enable approvals and swaps.
#[derive(Clone)]
pub struct EthersGateway<M> {
    client: Arc<M>,
    swap_helper: SwapHelper<M>,
}

impl<M: Middleware + 'static> EthersGateway<M> {
    pub fn new(client: Arc<M>, swap_helper: Address) -> Self {
        let swap_helper = SwapHelper::new(swap_helper, client.clone());
        Self {
            client,
            swap_helper,
        }
    }

    fn pool(&self, pool: Address) -> UniswapV3Pool<M> {
        UniswapV3Pool::new(pool, self.client.clone())
    }

    fn token(&self, token: Address) -> Erc20Token<M> {
        Erc20Token::new(token, self.client.clone())
    }

    /// Read symbol and decimals of an ERC-20 token.
    pub async fn describe_token(&self, token: Address) -> Result<TokenDescriptor, ChainError> {
        let erc20 = self.token(token);
        let symbol = erc20.symbol().call().await?;
        let decimals = erc20.decimals().call().await?;
        Ok(TokenDescriptor::new(token, symbol, decimals))
    }
}

impl<M: Middleware + 'static> TradingAccount for EthersGateway<M> {
    fn account(&self) -> Result<Address, ChainError> {
        self.client
            .default_sender()
            .ok_or_else(|| ChainError::new("no signing account configured (set PRIVATE_KEY)"))
    }
}

impl<M: Middleware + 'static> PoolReader for EthersGateway<M> {
    async fn slot0(&self, pool: Address) -> Result<PoolPriceState, ChainError> {
        let (sqrt_price_x96, tick, _, _, _, _fee_protocol, _unlocked) =
            self.pool(pool).slot_0().call().await?;
        Ok(PoolPriceState::new(sqrt_price_x96, tick))
    }

    async fn fee(&self, pool: Address) -> Result<u32, ChainError> {
        Ok(self.pool(pool).fee().call().await?)
    }
}

impl<M: Middleware + 'static> TokenLedger for EthersGateway<M> {
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256, ChainError> {
        Ok(self.token(token).balance_of(account).call().await?)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError> {
        Ok(self.token(token).allowance(owner, spender).call().await?)
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TransactionReceipt, ChainError> {
        let call = self.token(token).approve(spender, amount);
        let pending = call.send().await?;
        let tx_hash = *pending;
        debug!(?tx_hash, "[ALLOWANCE] approval sent, waiting for confirmation");
        pending.await?.ok_or_else(|| {
            ChainError::new(format!("approval {tx_hash:?} was dropped before confirmation"))
        })
    }
}

impl<M: Middleware + 'static> SwapSettlement for EthersGateway<M> {
    fn settlement_address(&self) -> Address {
        self.swap_helper.address()
    }

    async fn swap(&self, call: SettlementSwap) -> Result<TransactionReceipt, ChainError> {
        let amount_specified = I256::try_from(call.amount_specified)
            .map_err(|_| ChainError::new("swap amount exceeds the int256 range"))?;
        let tx = self.swap_helper.swap(
            call.pool,
            call.recipient,
            call.zero_for_one,
            call.sqrt_price_limit_x96,
            amount_specified,
            call.pay0,
            call.pay1,
        );
        let pending = tx.send().await?;
        let tx_hash = *pending;
        debug!(?tx_hash, "[SWAP] sent, waiting for confirmation");
        pending.await?.ok_or_else(|| {
            ChainError::new(format!("swap {tx_hash:?} was dropped before confirmation"))
        })
    }
}
