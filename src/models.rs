//! Shared data structures used throughout the engine.

use crate::amount::to_fixed_point;
use crate::errors::SwapError;
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// Default slippage tolerance: 0.5%.
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;
/// Default deadline: 20 minutes.
pub const DEFAULT_DEADLINE_SECS: u64 = 20 * 60;
/// Slippage is expressed against this denominator.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// ERC-20 token metadata the engine needs for conversions and messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenDescriptor {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Exact-input swap of `amount_in` of `token_in` through a single pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub token_in: TokenDescriptor,
    pub token_out: TokenDescriptor,
    /// Human-readable decimal amount, e.g. "10.5".
    pub amount_in: String,
    pub pool: Address,
    pub slippage_bps: u32,
    pub deadline_secs: u64,
    /// Receiver of the output token; the signing account when `None`.
    pub recipient: Option<Address>,
}

impl SwapRequest {
    pub fn new(
        token_in: TokenDescriptor,
        token_out: TokenDescriptor,
        amount_in: impl Into<String>,
        pool: Address,
    ) -> Self {
        Self {
            token_in,
            token_out,
            amount_in: amount_in.into(),
            pool,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            deadline_secs: DEFAULT_DEADLINE_SECS,
            recipient: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    pub fn with_deadline_secs(mut self, deadline_secs: u64) -> Self {
        self.deadline_secs = deadline_secs;
        self
    }

    pub fn with_recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// True when `token_in` is the pool's token0.
    ///
    /// Addresses compare byte-wise, which matches lowercase hex ordering.
    pub fn zero_for_one(&self) -> bool {
        self.token_in.address < self.token_out.address
    }

    /// Check the request and return the input amount in base units.
    pub fn validate(&self) -> Result<U256, SwapError> {
        if self.token_in.address == self.token_out.address {
            return Err(SwapError::InvalidAmount(
                "input and output token must differ".to_string(),
            ));
        }
        if self.slippage_bps >= BPS_DENOMINATOR {
            return Err(SwapError::InvalidAmount(format!(
                "slippage tolerance {} bps must be below {BPS_DENOMINATOR}",
                self.slippage_bps
            )));
        }
        let amount = to_fixed_point(&self.amount_in, self.token_in.decimals)?;
        if amount.is_zero() {
            return Err(SwapError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(amount)
    }
}

/// Structured result of [`crate::engine::SwapEngine::execute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapOutcome {
    pub success: bool,
    pub transaction_hash: Option<H256>,
    pub amount_in: String,
    pub amount_out: Option<String>,
    pub error_kind: Option<SwapError>,
    pub error_message: Option<String>,
}

impl SwapOutcome {
    pub fn succeeded(transaction_hash: H256, amount_in: String, amount_out: String) -> Self {
        Self {
            success: true,
            transaction_hash: Some(transaction_hash),
            amount_in,
            amount_out: Some(amount_out),
            error_kind: None,
            error_message: None,
        }
    }

    pub fn failed(amount_in: String, error: SwapError) -> Self {
        Self {
            success: false,
            transaction_hash: None,
            amount_in,
            amount_out: None,
            error_message: Some(error.to_string()),
            error_kind: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(n: u64, symbol: &str) -> TokenDescriptor {
        TokenDescriptor::new(Address::from_low_u64_be(n), symbol, 18)
    }

    #[test]
    fn defaults_match_documented_values() {
        let req = SwapRequest::new(token(1, "TK0"), token(2, "TK1"), "1", Address::zero());
        assert_eq!(req.slippage_bps, 50);
        assert_eq!(req.deadline_secs, 1200);
        assert_eq!(req.recipient, None);
    }

    #[test]
    fn zero_for_one_follows_address_order() {
        let forward = SwapRequest::new(token(1, "A"), token(2, "B"), "1", Address::zero());
        let backward = SwapRequest::new(token(2, "B"), token(1, "A"), "1", Address::zero());
        assert!(forward.zero_for_one());
        assert!(!backward.zero_for_one());
    }

    #[test]
    fn zero_for_one_ignores_hex_case() {
        let lower: Address = "0xbbaf9ad69510623c2a8152b68cf70da102ed186b".parse().unwrap();
        let mixed: Address = "0x78A4C5b3aA0b285b6aAa7895A9DB2e69a6a12Be2".parse().unwrap();
        let req = SwapRequest::new(
            TokenDescriptor::new(mixed, "TK1", 18),
            TokenDescriptor::new(lower, "TK0", 18),
            "1",
            Address::zero(),
        );
        // "0x78a4..." < "0xbbaf..."
        assert!(req.zero_for_one());
    }

    #[test]
    fn validate_rejects_bad_requests() {
        let base = SwapRequest::new(token(1, "A"), token(2, "B"), "1", Address::zero());
        assert!(base.clone().with_slippage_bps(10_000).validate().is_err());
        assert!(base.clone().with_slippage_bps(9_999).validate().is_ok());

        let mut zero = base.clone();
        zero.amount_in = "0".into();
        assert!(matches!(zero.validate(), Err(SwapError::InvalidAmount(_))));

        let same = SwapRequest::new(token(1, "A"), token(1, "A"), "1", Address::zero());
        assert!(same.validate().is_err());
    }

    #[test]
    fn outcome_populates_exactly_one_side() {
        let ok = SwapOutcome::succeeded(H256::zero(), "1".into(), "0.99".into());
        assert!(ok.amount_out.is_some() && ok.error_kind.is_none());

        let failed = SwapOutcome::failed("1".into(), SwapError::UserRejected);
        assert!(failed.amount_out.is_none());
        assert_eq!(failed.error_kind, Some(SwapError::UserRejected));
        assert_eq!(
            failed.error_message.as_deref(),
            Some("Transaction was rejected by the user.")
        );
    }
}
