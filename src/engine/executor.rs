use crate::chain::{SettlementSwap, SwapSettlement};
use crate::dex::{PoolPriceState, pay_amounts, sqrt_price_limit};
use crate::errors::{SwapError, normalize};
use crate::models::SwapRequest;
use ethers::types::{Address, TransactionReceipt, U256, U64};
use tracing::info;

/// Build the settlement call for an exact-input swap of `amount_in`.
pub fn build_swap_call(
    request: &SwapRequest,
    state: &PoolPriceState,
    amount_in: U256,
    recipient: Address,
) -> SettlementSwap {
    let zero_for_one = request.zero_for_one();
    let (pay0, pay1) = pay_amounts(amount_in, zero_for_one);
    SettlementSwap {
        pool: request.pool,
        recipient,
        zero_for_one,
        sqrt_price_limit_x96: sqrt_price_limit(state, zero_for_one, request.slippage_bps),
        amount_specified: amount_in,
        pay0,
        pay1,
    }
}

/// Send the swap through the settlement contract and wait for it to be mined.
///
/// Once this is called the transaction is out of our hands; there is no
/// cancellation or retry.
pub async fn submit<S: SwapSettlement>(
    settlement: &S,
    request: &SwapRequest,
    state: &PoolPriceState,
    amount_in: U256,
    recipient: Address,
) -> Result<TransactionReceipt, SwapError> {
    let call = build_swap_call(request, state, amount_in, recipient);
    info!(
        pool = ?call.pool,
        zero_for_one = call.zero_for_one,
        limit = %call.sqrt_price_limit_x96,
        amount = %call.amount_specified,
        deadline_secs = request.deadline_secs,
        "[SWAP] submitting"
    );

    let receipt = settlement.swap(call).await.map_err(|e| normalize(&e))?;
    if receipt.status == Some(U64::zero()) {
        return Err(SwapError::ContractReverted(format!(
            "swap transaction {:?} failed",
            receipt.transaction_hash
        )));
    }
    info!(tx = ?receipt.transaction_hash, block = ?receipt.block_number, "[SWAP] confirmed");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenDescriptor;

    fn request(token_in: u64, token_out: u64) -> SwapRequest {
        SwapRequest::new(
            TokenDescriptor::new(Address::from_low_u64_be(token_in), "IN", 18),
            TokenDescriptor::new(Address::from_low_u64_be(token_out), "OUT", 18),
            "1",
            Address::from_low_u64_be(500),
        )
        .with_slippage_bps(100)
    }

    #[test]
    fn selling_token0_pays_token0_and_caps_below() {
        let state = PoolPriceState::new(U256::one() << 96, 0);
        let call = build_swap_call(&request(1, 2), &state, U256::from(42u64), Address::zero());
        assert!(call.zero_for_one);
        assert_eq!((call.pay0, call.pay1), (U256::from(42u64), U256::zero()));
        assert!(call.sqrt_price_limit_x96 < state.sqrt_price_x96);
        assert_eq!(call.amount_specified, U256::from(42u64));
    }

    #[test]
    fn selling_token1_pays_token1_and_caps_above() {
        let state = PoolPriceState::new(U256::one() << 96, 0);
        let call = build_swap_call(&request(2, 1), &state, U256::from(42u64), Address::zero());
        assert!(!call.zero_for_one);
        assert_eq!((call.pay0, call.pay1), (U256::zero(), U256::from(42u64)));
        assert!(call.sqrt_price_limit_x96 > state.sqrt_price_x96);
        assert_eq!(call.pool, Address::from_low_u64_be(500));
    }
}
