//! Swap quoting and execution over an injected [`SwapGateway`].

use crate::amount::to_human;
use crate::chain::SwapGateway;
use crate::dex::{PoolPriceState, estimate_amount_out};
use crate::dex::receipt::extract_amount_out;
use crate::errors::{ChainError, SwapError, normalize};
use crate::models::{SwapOutcome, SwapRequest};
use ethers::types::{H256, U256};
use tracing::{debug, info, warn};

pub mod executor;
pub mod guards;

/// Quotes and executes single-pool exact-input swaps.
///
/// Holds no state besides the gateway; each call reads the chain afresh.
pub struct SwapEngine<G> {
    gateway: G,
}

impl<G: SwapGateway> SwapEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Estimated human amount of `token_out` for the request.
    ///
    /// Only an invalid request is an error. Chain failures produce `"0"` so a
    /// caller displaying the quote is never interrupted.
    pub async fn quote(&self, request: &SwapRequest) -> Result<String, SwapError> {
        let amount_in = request.validate()?;
        match self.estimate(request, amount_in).await {
            Ok(out) => to_human(out, request.token_out.decimals),
            Err(e) => {
                warn!(error = %e, pool = ?request.pool, "[QUOTE] pool read failed, quoting zero");
                Ok("0".to_string())
            }
        }
    }

    async fn estimate(&self, request: &SwapRequest, amount_in: U256) -> Result<U256, ChainError> {
        let state = self.gateway.slot0(request.pool).await?;
        let fee = self.gateway.fee(request.pool).await?;
        let zero_for_one = request.zero_for_one();
        let out = estimate_amount_out(amount_in, &state, zero_for_one, fee);
        debug!(
            spot = state.spot_price(),
            tick = state.tick,
            fee,
            zero_for_one,
            %amount_in,
            %out,
            "[QUOTE] estimated"
        );
        Ok(out)
    }

    /// Run balance check, allowance fix, swap and receipt parsing in order.
    ///
    /// Returns `Err` only when the request itself is invalid, before any chain
    /// call. Every later failure is reported inside the [`SwapOutcome`].
    pub async fn execute(&self, request: &SwapRequest) -> Result<SwapOutcome, SwapError> {
        let amount_in = request.validate()?;
        info!(
            token_in = %request.token_in.symbol,
            token_out = %request.token_out.symbol,
            amount_in = %request.amount_in,
            slippage_bps = request.slippage_bps,
            "[SWAP] starting"
        );

        match self.run(request, amount_in).await {
            Ok((tx, amount_out)) => {
                info!(?tx, %amount_out, "[SWAP] done");
                Ok(SwapOutcome::succeeded(
                    tx,
                    request.amount_in.clone(),
                    amount_out,
                ))
            }
            Err(e) => {
                warn!(error = %e, "[SWAP] failed");
                Ok(SwapOutcome::failed(request.amount_in.clone(), e))
            }
        }
    }

    async fn run(&self, request: &SwapRequest, amount_in: U256) -> Result<(H256, String), SwapError> {
        let account = self.gateway.account().map_err(|e| normalize(&e))?;
        let recipient = request.recipient.unwrap_or(account);
        let spender = self.gateway.settlement_address();

        guards::ensure_sufficient_balance(&self.gateway, &request.token_in, account, amount_in)
            .await?;
        guards::ensure_allowance(&self.gateway, &request.token_in, account, spender, amount_in)
            .await?;

        let state = self.pool_state(request).await?;
        let receipt =
            executor::submit(&self.gateway, request, &state, amount_in, recipient).await?;
        let amount_out = extract_amount_out(&receipt, &request.token_out, recipient)?;
        Ok((receipt.transaction_hash, amount_out))
    }

    async fn pool_state(&self, request: &SwapRequest) -> Result<PoolPriceState, SwapError> {
        let state = self
            .gateway
            .slot0(request.pool)
            .await
            .map_err(|e| SwapError::PoolUnavailable(e.to_string()))?;
        if !state.is_initialized() {
            return Err(SwapError::PoolUnavailable(format!(
                "pool {:?} is not initialized",
                request.pool
            )));
        }
        Ok(state)
    }
}
