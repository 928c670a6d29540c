use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// A caller's request to escrow tokens for an email recipient.
///
/// The request is validated and consumed by a single `create_transfer` call; nothing about it is
/// kept by the driver afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Recipient email as entered, before trimming and lowercasing.
    pub email: String,
    /// Human readable amount, e.g. `"100.5"`.
    pub amount: String,
    /// Decimals of the escrowed token.
    pub decimals: u8,
    /// Token to escrow. Defaults to the configured token, then the network default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
    /// Expiry as unix seconds. Defaults to now plus the configured expiry window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
    /// Wallet the funds are pulled from. Defaults to the configured treasury.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_wallet: Option<Address>,
}

impl TransferRequest {
    /// Creates a new request using the configured defaults for everything optional.
    pub fn new(email: impl Into<String>, amount: impl Into<String>, decimals: u8) -> Self {
        Self { email: email.into(), amount: amount.into(), decimals, ..Default::default() }
    }

    /// Sets the token to escrow.
    pub fn with_token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the expiry timestamp.
    pub fn with_expiry(mut self, expiry: u64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Sets the wallet the funds are pulled from.
    pub fn with_funding_wallet(mut self, funding_wallet: Address) -> Self {
        self.funding_wallet = Some(funding_wallet);
        self
    }
}
