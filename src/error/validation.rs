use alloy::primitives::U256;
use thiserror::Error;

/// Errors raised while validating a transfer request.
///
/// These are deterministic and always raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The amount is not a plain non-negative decimal, or has more fractional digits than the
    /// token supports.
    #[error("invalid amount {amount:?}: {reason}")]
    InvalidAmount {
        /// The amount as supplied.
        amount: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The atomic amount is zero or does not fit the contract's `uint96` field.
    #[error("amount {0} out of range (0, 2^96)")]
    AmountOutOfRange(U256),
    /// The expiry does not fit the contract's `uint40` field.
    #[error("expiry {0} out of range [0, 2^40)")]
    ExpiryOutOfRange(u64),
    /// The expiry is not in the future.
    #[error("expiry {expiry} is not after the current time {now}")]
    ExpiryInPast {
        /// The requested expiry.
        expiry: u64,
        /// The time of validation.
        now: u64,
    },
}

impl ValidationError {
    pub(crate) fn invalid_amount(amount: &str, reason: &'static str) -> Self {
        Self::InvalidAmount { amount: amount.to_string(), reason }
    }
}
