//! Driver-side views of on-chain transfer state.

use super::{CommitmentTransfer, HashLockTransfer, U96};
use crate::error::EscrowError;
use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a commitment transfer.
///
/// `Expired` is not stored on-chain: it is how a transfer that is still `CREATED` reads once its
/// expiry has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentStatus {
    /// Funds are locked and claimable.
    Created,
    /// Funds were released to the recipient.
    Claimed,
    /// Funds were returned.
    Refunded,
    /// Still created on-chain, but past expiry.
    Expired,
}

impl CommitmentStatus {
    /// Status code of a created transfer.
    pub const CREATED: u8 = 1;
    /// Status code of a claimed transfer.
    pub const CLAIMED: u8 = 2;
    /// Status code of a refunded transfer.
    pub const REFUNDED: u8 = 3;

    /// Classifies a raw status code at time `now`.
    pub fn classify(code: u8, expiry: u64, now: u64) -> Result<Self, EscrowError> {
        match code {
            Self::CREATED if now > expiry => Ok(Self::Expired),
            Self::CREATED => Ok(Self::Created),
            Self::CLAIMED => Ok(Self::Claimed),
            Self::REFUNDED => Ok(Self::Refunded),
            other => Err(EscrowError::UnrecognizedStatus(other)),
        }
    }

    /// Whether the transfer can no longer change state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed | Self::Refunded)
    }
}

impl fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Claimed => "claimed",
            Self::Refunded => "refunded",
            Self::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// A commitment transfer as read from the escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferState {
    /// On-chain id of the transfer.
    pub transfer_id: B256,
    /// Address the funds were pulled from.
    pub sender: Address,
    /// Escrowed token.
    pub token: Address,
    /// Escrowed amount in atomic units.
    pub amount: U96,
    /// Committed recipient hash.
    pub recipient_hash: B256,
    /// Expiry timestamp.
    pub expiry: u64,
    /// Status at the time of the read.
    pub status: CommitmentStatus,
}

impl TransferState {
    /// Interprets a stored transfer.
    ///
    /// A zero sender with a zero amount is what the escrow returns for an id it has never seen,
    /// and yields `None` rather than a zeroed state.
    pub fn from_onchain(
        transfer_id: B256,
        transfer: CommitmentTransfer,
        now: u64,
    ) -> Result<Option<Self>, EscrowError> {
        if transfer.sender.is_zero() && transfer.amount.is_zero() {
            return Ok(None);
        }

        let expiry = transfer.expiry.to::<u64>();
        Ok(Some(Self {
            transfer_id,
            sender: transfer.sender,
            token: transfer.token,
            amount: transfer.amount,
            recipient_hash: transfer.recipientHash,
            expiry,
            status: CommitmentStatus::classify(transfer.status, expiry, now)?,
        }))
    }
}

/// Status of an HTLC transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtlcStatus {
    /// Funds are locked and claimable with the secret.
    Pending,
    /// Funds were released with the secret.
    Claimed,
    /// Funds were returned after expiry.
    Refunded,
    /// Funds were returned by the sender before a claim.
    Cancelled,
}

impl HtlcStatus {
    /// Maps a raw status code.
    ///
    /// `0` means the lock does not exist. Codes outside the known set indicate an ABI mismatch
    /// and are an error, never `None`.
    pub fn from_code(code: u8) -> Result<Option<Self>, EscrowError> {
        match code {
            0 => Ok(None),
            1 => Ok(Some(Self::Pending)),
            2 => Ok(Some(Self::Claimed)),
            3 => Ok(Some(Self::Refunded)),
            4 => Ok(Some(Self::Cancelled)),
            other => Err(EscrowError::UnrecognizedStatus(other)),
        }
    }

    /// Whether the transfer can no longer change state.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for HtlcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Refunded => "refunded",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// An HTLC transfer as read from the escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtlcLock {
    /// On-chain id of the transfer.
    pub transfer_id: B256,
    /// Address the funds were pulled from.
    pub sender: Address,
    /// Escrowed token.
    pub token: Address,
    /// Escrowed amount in atomic units.
    pub amount: U96,
    /// `keccak256(secret)`.
    pub hash_lock: B256,
    /// Expiry timestamp.
    pub expiry: u64,
    /// Current status.
    pub status: HtlcStatus,
}

impl HtlcLock {
    /// Interprets a stored lock, `None` if it was never created.
    pub fn from_onchain(
        transfer_id: B256,
        lock: HashLockTransfer,
    ) -> Result<Option<Self>, EscrowError> {
        let Some(status) = HtlcStatus::from_code(lock.status)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            transfer_id,
            sender: lock.sender,
            token: lock.token,
            amount: lock.amount,
            hash_lock: lock.hashLock,
            expiry: lock.expiry.to::<u64>(),
            status,
        }))
    }
}
