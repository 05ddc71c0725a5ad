//! Pre-trade checks: balance first, then allowance.

use crate::amount::to_human;
use crate::chain::TokenLedger;
use crate::errors::{SwapError, normalize};
use crate::models::TokenDescriptor;
use ethers::types::{Address, U256, U64};
use tracing::{debug, info};

/// Fail unless `account` holds at least `required` of `token`.
///
/// Read-only: nothing is sent when this fails.
pub async fn ensure_sufficient_balance<L: TokenLedger>(
    ledger: &L,
    token: &TokenDescriptor,
    account: Address,
    required: U256,
) -> Result<(), SwapError> {
    let held = ledger
        .balance_of(token.address, account)
        .await
        .map_err(|e| normalize(&e))?;
    debug!(token = %token.symbol, %held, %required, "[BALANCE] checked");

    if held < required {
        let held_human = to_human(held, token.decimals)?;
        let required_human = to_human(required, token.decimals)?;
        return Err(SwapError::InsufficientBalance(format!(
            "Insufficient balance. You have {held_human} {sym}, but the swap requires {required_human} {sym}.",
            sym = token.symbol
        )));
    }
    Ok(())
}

/// Make sure `spender` may pull `required` of `token` from `owner`.
///
/// Approves the maximum amount when the current allowance is short, so later
/// swaps skip this step. Returns whether an approval was sent.
pub async fn ensure_allowance<L: TokenLedger>(
    ledger: &L,
    token: &TokenDescriptor,
    owner: Address,
    spender: Address,
    required: U256,
) -> Result<bool, SwapError> {
    let current = ledger
        .allowance(token.address, owner, spender)
        .await
        .map_err(|e| normalize(&e))?;
    if current >= required {
        debug!(token = %token.symbol, %current, "[ALLOWANCE] sufficient");
        return Ok(false);
    }

    info!(token = %token.symbol, ?spender, "[ALLOWANCE] approving settlement contract");
    let receipt = ledger
        .approve(token.address, spender, U256::MAX)
        .await
        .map_err(|e| normalize(&e))?;
    if receipt.status == Some(U64::zero()) {
        return Err(SwapError::ContractReverted(format!(
            "approval transaction {:?} failed",
            receipt.transaction_hash
        )));
    }
    info!(tx = ?receipt.transaction_hash, "[ALLOWANCE] approval confirmed");
    Ok(true)
}
