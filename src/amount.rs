//! Conversion between human-readable decimal amounts and on-chain integers.

use crate::errors::SwapError;
use bigdecimal::BigDecimal;
use ethers::{types::U256, utils::format_units};
use num_bigint::BigInt;
use num_traits::Zero;
use std::str::FromStr;

/// Largest decimal count a 256-bit amount can carry.
pub const MAX_DECIMALS: u8 = 77;

/// Decimal digits in `U256::MAX`.
const MAX_UINT256_DIGITS: u32 = 78;

/// Parse a non-negative decimal string into base units of a token with
/// `decimals` fractional digits. Inputs with more precision than the token
/// supports are rejected rather than truncated.
pub fn to_fixed_point(human: &str, decimals: u8) -> Result<U256, SwapError> {
    if decimals > MAX_DECIMALS {
        return Err(SwapError::InvalidAmount(format!(
            "token declares {decimals} decimals (max {MAX_DECIMALS})"
        )));
    }
    let trimmed = human.trim();
    if trimmed.contains(['e', 'E']) {
        return Err(SwapError::InvalidAmount(format!(
            "'{trimmed}' uses exponent notation"
        )));
    }
    let value = BigDecimal::from_str(trimmed)
        .map_err(|_| SwapError::InvalidAmount(format!("'{trimmed}' is not a decimal number")))?;
    if value < BigDecimal::zero() {
        return Err(SwapError::InvalidAmount(format!(
            "'{trimmed}' is negative"
        )));
    }

    let (digits, scale) = value.normalized().as_bigint_and_exponent();
    if scale > i64::from(decimals) {
        return Err(SwapError::InvalidAmount(format!(
            "'{trimmed}' has more than {decimals} decimal places"
        )));
    }
    let too_large =
        || SwapError::InvalidAmount(format!("'{trimmed}' exceeds the 256-bit range"));
    // scale <= decimals, so the shift is never negative
    let shift = u32::try_from(i64::from(decimals) - scale).map_err(|_| too_large())?;
    let digit_count = u32::try_from(digits.to_string().len()).map_err(|_| too_large())?;
    if digits.is_zero() {
        return Ok(U256::zero());
    }
    if digit_count.saturating_add(shift) > MAX_UINT256_DIGITS {
        return Err(too_large());
    }
    let fixed = digits * BigInt::from(10u32).pow(shift);

    U256::from_dec_str(&fixed.to_string()).map_err(|_| too_large())
}

/// Render base units as a decimal string without trailing fractional zeros.
pub fn to_human(amount: U256, decimals: u8) -> Result<String, SwapError> {
    let formatted = format_units(amount, u32::from(decimals))
        .map_err(|e| SwapError::InvalidAmount(e.to_string()))?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}
