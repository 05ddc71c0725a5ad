//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use crate::models::{DEFAULT_DEADLINE_SECS, DEFAULT_SLIPPAGE_BPS};
use ethers::types::Address;
use url::Url;

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// RPC endpoint for the Ethereum-compatible node.
    pub rpc_url: Url,
    /// Hex private key of the trading account; read-only mode when absent.
    pub private_key: Option<String>,
    /// Deployed swap helper (settlement) contract.
    pub swap_helper: Address,
    pub pool: Address,
    pub token_in: Address,
    pub token_out: Address,
    /// Human-readable input amount, e.g. "10.5".
    pub amount_in: String,
    pub slippage_bps: u32,
    pub deadline_secs: u64,
    pub recipient: Option<Address>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("Set {key} env var")))
        };
        let address = |key: &str| -> Result<Address> {
            let raw = required(key)?;
            raw.trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key}={raw} is not an address: {e}")))
        };

        let rpc_url = Url::parse(&required("RPC_URL")?)?;
        let private_key = lookup("PRIVATE_KEY").filter(|v| !v.trim().is_empty());
        let slippage_bps = match lookup("SLIPPAGE_BPS") {
            Some(v) => v.trim().parse()?,
            None => DEFAULT_SLIPPAGE_BPS,
        };
        let deadline_secs = match lookup("DEADLINE_SECS") {
            Some(v) => v.trim().parse()?,
            None => DEFAULT_DEADLINE_SECS,
        };
        let recipient = match lookup("RECIPIENT") {
            Some(_) => Some(address("RECIPIENT")?),
            None => None,
        };

        Ok(Self {
            rpc_url,
            private_key,
            swap_helper: address("SWAP_HELPER_ADDRESS")?,
            pool: address("POOL_ADDRESS")?,
            token_in: address("TOKEN_IN")?,
            token_out: address("TOKEN_OUT")?,
            amount_in: required("AMOUNT_IN")?,
            slippage_bps,
            deadline_secs,
            recipient,
        })
    }
}
