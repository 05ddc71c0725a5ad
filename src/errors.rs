use ethers::{
    abi::{ParamType, Token},
    types::Bytes,
    utils::hex,
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse int error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] ethers::signers::WalletError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Swap error: {0}")]
    Swap(#[from] SwapError),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Failure reported by a chain capability (RPC, signer or contract call).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ChainError {
    pub message: String,
    /// Raw revert payload, when the node returned one.
    pub revert_data: Option<Bytes>,
}

impl ChainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            revert_data: None,
        }
    }

    pub fn with_revert_data(mut self, data: Bytes) -> Self {
        self.revert_data = Some(data);
        self
    }
}

/// Closed set of failures a swap can end in.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum SwapError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0}")]
    InsufficientBalance(String),

    #[error(
        "Insufficient token allowance. Please approve the swap helper contract to spend your tokens."
    )]
    InsufficientAllowance,

    #[error("Transaction was rejected by the user.")]
    UserRejected,

    #[error("Pool unavailable: {0}")]
    PoolUnavailable(String),

    #[error("Contract reverted: {0}")]
    ContractReverted(String),

    #[error("{0}")]
    Unknown(String),
}

/// Selector of Solidity's `Error(string)`.
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
const ERROR_STRING_SELECTOR_HEX: &str = "0x08c379a0";

const PRICE_IMPACT_HINT: &str =
    "Price impact is too high. Try a smaller amount or adjust slippage tolerance.";

/// Map a raw chain failure onto [`SwapError`].
///
/// Revert payloads win over message text. A decoded reason that names a known
/// condition (e.g. `ERC20: insufficient allowance`) still maps to that
/// condition; any other reason becomes `ContractReverted`.
pub fn normalize(err: &ChainError) -> SwapError {
    let reason = err
        .revert_data
        .as_deref()
        .and_then(decode_revert_reason)
        .or_else(|| revert_reason_in_message(&err.message));

    if let Some(reason) = reason {
        return classify(&reason).unwrap_or(SwapError::ContractReverted(reason));
    }

    classify(&err.message).unwrap_or_else(|| SwapError::Unknown(err.message.clone()))
}

/// Decode an ABI-encoded `Error(string)` revert payload.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    match ethers::abi::decode(&[ParamType::String], &data[4..])
        .ok()?
        .pop()?
    {
        Token::String(reason) => Some(reason),
        _ => None,
    }
}

/// Some providers only surface the revert payload inside the error text.
fn revert_reason_in_message(message: &str) -> Option<String> {
    let lower = message.to_ascii_lowercase();
    let start = lower.find(ERROR_STRING_SELECTOR_HEX)?;
    let payload: String = lower[start + 2..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();
    let bytes = hex::decode(payload).ok()?;
    decode_revert_reason(&bytes)
}

fn classify(text: &str) -> Option<SwapError> {
    let lower = text.to_ascii_lowercase();
    if lower.contains("insufficient allowance") {
        Some(SwapError::InsufficientAllowance)
    } else if lower.contains("insufficient funds") || lower.contains("underflow balance") {
        Some(SwapError::InsufficientBalance(
            "Insufficient token balance for this swap.".to_string(),
        ))
    } else if lower.contains("user rejected") || lower.contains("user denied") {
        Some(SwapError::UserRejected)
    } else if lower.contains("price impact too high") {
        Some(SwapError::ContractReverted(PRICE_IMPACT_HINT.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_string_payload(reason: &str) -> Vec<u8> {
        let mut data = ERROR_STRING_SELECTOR.to_vec();
        data.extend(ethers::abi::encode(&[Token::String(reason.to_string())]));
        data
    }

    #[test]
    fn decodes_error_string_payload() {
        let err = ChainError::new("execution reverted")
            .with_revert_data(Bytes::from(error_string_payload("X")));
        assert_eq!(normalize(&err), SwapError::ContractReverted("X".into()));
    }

    #[test]
    fn decodes_payload_embedded_in_message() {
        let payload = hex::encode(error_string_payload("SPL"));
        let err = ChainError::new(format!(
            "(code: 3, message: execution reverted, data: Some(String(\"0x{payload}\")))"
        ));
        assert_eq!(normalize(&err), SwapError::ContractReverted("SPL".into()));
    }

    #[test]
    fn known_reason_inside_revert_maps_to_its_kind() {
        let err = ChainError::new("execution reverted").with_revert_data(Bytes::from(
            error_string_payload("ERC20: insufficient allowance"),
        ));
        assert_eq!(normalize(&err), SwapError::InsufficientAllowance);
    }

    #[test]
    fn classifies_known_substrings() {
        assert_eq!(
            normalize(&ChainError::new("MetaMask Tx Signature: User Rejected transaction")),
            SwapError::UserRejected
        );
        assert!(matches!(
            normalize(&ChainError::new("insufficient funds for gas * price + value")),
            SwapError::InsufficientBalance(_)
        ));
        assert!(matches!(
            normalize(&ChainError::new("underflow balance sender")),
            SwapError::InsufficientBalance(_)
        ));
        assert_eq!(
            normalize(&ChainError::new("reverted: price impact too high")),
            SwapError::ContractReverted(PRICE_IMPACT_HINT.into())
        );
    }

    #[test]
    fn falls_back_to_unknown_with_original_message() {
        let err = ChainError::new("connection reset by peer");
        assert_eq!(
            normalize(&err),
            SwapError::Unknown("connection reset by peer".into())
        );
    }

    #[test]
    fn ignores_payload_with_foreign_selector() {
        let data = vec![0x4e, 0x48, 0x7b, 0x71, 0, 0, 0, 0];
        assert_eq!(decode_revert_reason(&data), None);
        assert_eq!(decode_revert_reason(&[0x08, 0xc3]), None);
    }
}
