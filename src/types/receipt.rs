//! Receipts produced by the escrow drivers.

use super::{Secret, U40, U96};
use alloy::primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};

/// A contract call that was not submitted because no relayer signer is configured.
///
/// The caller is expected to sign and send it from its own wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedCall {
    /// Contract to call.
    pub to: Address,
    /// ABI encoded calldata.
    pub input: Bytes,
    /// Native value to attach.
    pub value: U256,
}

/// Outcome of building a creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    /// The call was signed by the relayer and mined.
    Submitted {
        /// Hash of the mined transaction.
        tx_hash: B256,
    },
    /// The call is returned for a caller-side signer.
    Unsigned(UnsignedCall),
}

impl Submission {
    /// Returns the transaction hash if the call was submitted.
    pub const fn tx_hash(&self) -> Option<B256> {
        match self {
            Self::Submitted { tx_hash } => Some(*tx_hash),
            Self::Unsigned(_) => None,
        }
    }

    /// Returns the unsigned call if the call was not submitted.
    pub const fn as_unsigned(&self) -> Option<&UnsignedCall> {
        match self {
            Self::Submitted { .. } => None,
            Self::Unsigned(call) => Some(call),
        }
    }
}

/// Receipt of a commitment escrow creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCreationReceipt {
    /// On-chain id of the transfer.
    pub transfer_id: B256,
    /// Salted hash of the normalized recipient email.
    pub recipient_hash: B256,
    /// Escrowed token.
    pub token: Address,
    /// Wallet the funds are pulled from.
    pub from: Address,
    /// Escrowed amount in atomic units.
    pub amount: U96,
    /// Expiry timestamp.
    pub expiry: U40,
    /// Whether the call was submitted or handed back.
    pub submission: Submission,
}

/// Receipt of an HTLC lock.
///
/// This is the only place the secret exists. The caller must deliver it to the recipient; it
/// cannot be derived again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtlcCreationReceipt {
    /// On-chain id of the transfer.
    pub transfer_id: B256,
    /// `keccak256(secret)`.
    pub hash_lock: B256,
    /// Preimage of the hash lock.
    pub secret: Secret,
    /// Escrowed token.
    pub token: Address,
    /// Wallet the funds are pulled from.
    pub from: Address,
    /// Escrowed amount in atomic units.
    pub amount: U96,
    /// Expiry timestamp.
    pub expiry: U40,
    /// Whether the call was submitted or handed back.
    pub submission: Submission,
}

/// Receipt of a mined claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    /// Claimed transfer.
    pub transfer_id: B256,
    /// Address the funds were released to.
    pub recipient: Address,
    /// Hash of the claim transaction.
    pub tx_hash: B256,
}

/// Receipt of a mined refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceipt {
    /// Refunded transfer.
    pub transfer_id: B256,
    /// Hash of the refund transaction.
    pub tx_hash: B256,
}

/// Receipt of a mined HTLC cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelReceipt {
    /// Cancelled transfer.
    pub transfer_id: B256,
    /// Hash of the cancel transaction.
    pub tx_hash: B256,
}
