//! Conversion between human readable token amounts and the contract's integer fields.
//!
//! Amounts are parsed digit by digit; nothing goes through floating point and a value is never
//! rounded or truncated to fit the token's decimals.

use crate::{
    constants::{MAX_UINT40, MAX_UINT96},
    error::ValidationError,
    types::{U40, U96},
};
use alloy::primitives::{U256, utils::format_units};

/// Parses a decimal amount into atomic token units.
///
/// Accepts plain non-negative decimal literals such as `"100"`, `"100.5"` or `".5"`. Signs,
/// exponents, separators and whitespace are rejected, as is any amount with more significant
/// fractional digits than `decimals`.
pub fn to_atomic_amount(amount: &str, decimals: u8) -> Result<U256, ValidationError> {
    let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err(ValidationError::invalid_amount(amount, "no digits"));
    }
    if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::invalid_amount(amount, "not a decimal number"));
    }

    // trailing zeros carry no precision
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(ValidationError::invalid_amount(
            amount,
            "more fractional digits than the token supports",
        ));
    }

    let mut digits = String::with_capacity(integer.len() + decimals as usize);
    digits.push_str(integer);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat_n('0', decimals as usize - fraction.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10)
        .map_err(|_| ValidationError::invalid_amount(amount, "amount overflows 256 bits"))
}

/// Checks that an atomic amount fits the contract's `uint96` field and is not zero.
pub fn validate_amount(atomic: U256) -> Result<U96, ValidationError> {
    if atomic.is_zero() || atomic > U256::from(MAX_UINT96) {
        return Err(ValidationError::AmountOutOfRange(atomic));
    }
    Ok(U96::from(atomic.to::<u128>()))
}

/// Checks that an expiry fits the contract's `uint40` field.
pub fn validate_expiry(expiry: u64) -> Result<U40, ValidationError> {
    if expiry > MAX_UINT40 {
        return Err(ValidationError::ExpiryOutOfRange(expiry));
    }
    Ok(U40::from(expiry))
}

/// Formats atomic units as a decimal amount without trailing zeros, e.g. `100500000` with 6
/// decimals as `"100.5"`.
pub fn format_atomic_amount(atomic: U256, decimals: u8) -> Result<String, ValidationError> {
    let formatted = format_units(atomic, decimals).map_err(|_| {
        ValidationError::invalid_amount(&atomic.to_string(), "decimals out of range")
    })?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted.trim_end_matches('0').trim_end_matches('.').to_string())
}
