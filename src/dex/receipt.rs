//! Extraction of the realized output amount from a confirmed swap.

use crate::amount::to_human;
use crate::errors::SwapError;
use crate::models::TokenDescriptor;
use ethers::{
    types::{Address, H256, Log, TransactionReceipt, U256},
    utils::keccak256,
};
use tracing::debug;

/// `keccak256("Transfer(address,address,uint256)")`
pub fn transfer_topic() -> H256 {
    H256::from(keccak256("Transfer(address,address,uint256)"))
}

/// Amount of the last ERC-20 transfer of `token` to `recipient` in `logs`.
pub fn last_transfer_to(logs: &[Log], token: Address, recipient: Address) -> Option<U256> {
    let topic = transfer_topic();
    logs.iter()
        .rev()
        .find(|log| {
            log.address == token
                && log.topics.len() == 3
                && log.topics[0] == topic
                && Address::from(log.topics[2]) == recipient
                && log.data.len() >= 32
        })
        .map(|log| U256::from_big_endian(&log.data[..32]))
}

/// Human amount of `token_out` the recipient received in this transaction.
///
/// Returns `"0"` when no matching transfer is found; the swap already
/// succeeded on-chain at this point.
pub fn extract_amount_out(
    receipt: &TransactionReceipt,
    token_out: &TokenDescriptor,
    recipient: Address,
) -> Result<String, SwapError> {
    match last_transfer_to(&receipt.logs, token_out.address, recipient) {
        Some(amount) => to_human(amount, token_out.decimals),
        None => {
            debug!(
                tx = ?receipt.transaction_hash,
                token = %token_out.symbol,
                "[SWAP] no transfer to recipient found in receipt"
            );
            Ok("0".to_string())
        }
    }
}
