use crate::types::{
    ICommitmentEscrow::ICommitmentEscrowErrors, IHashLockEscrow::IHashLockEscrowErrors,
};
use alloy::{
    primitives::{B256, Bytes},
    sol_types::SolInterface,
};
use thiserror::Error;

/// An on-chain rejection of an escrow call.
///
/// The call definitely did not take effect: either it reverted during gas estimation and was never
/// broadcast, or it was mined with a failed status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct EscrowRevert {
    /// The returned revert data, empty if the node did not return any.
    revert_data: Bytes,
    /// Decoded revert reason.
    decoded_error: Option<String>,
    /// The mined transaction, if the revert happened on-chain rather than in estimation.
    tx_hash: Option<B256>,
    /// Whether the contract rejected the call because the transfer already exists.
    already_exists: bool,
}

impl std::fmt::Display for EscrowRevert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { revert_data, decoded_error, tx_hash, .. } = self;
        write!(f, "escrow call reverted")?;
        if let Some(tx_hash) = tx_hash {
            write!(f, " in {tx_hash}")?;
        }
        match decoded_error {
            Some(err) => write!(f, ": {err}"),
            None if revert_data.is_empty() => Ok(()),
            None => write!(f, ": {revert_data}"),
        }
    }
}

impl EscrowRevert {
    /// Creates a new instance of [`EscrowRevert`]. Attempts to decode [`ICommitmentEscrowErrors`]
    /// and [`IHashLockEscrowErrors`].
    pub fn new(revert_data: Bytes) -> Self {
        let mut already_exists = false;
        let decoded_error = if let Ok(err) = ICommitmentEscrowErrors::abi_decode(&revert_data) {
            already_exists = matches!(err, ICommitmentEscrowErrors::TransferAlreadyExists(_));
            Some(format!("{err:?}"))
        } else if let Ok(err) = IHashLockEscrowErrors::abi_decode(&revert_data) {
            already_exists = matches!(err, IHashLockEscrowErrors::LockAlreadyExists(_));
            Some(format!("{err:?}"))
        } else {
            None
        };

        Self { revert_data, decoded_error, tx_hash: None, already_exists }
    }

    /// Creates an [`EscrowRevert`] for a transaction that was mined with a failed status.
    pub fn mined(tx_hash: B256) -> Self {
        Self {
            revert_data: Bytes::new(),
            decoded_error: None,
            tx_hash: Some(tx_hash),
            already_exists: false,
        }
    }

    /// Returns the raw revert data.
    pub const fn revert_data(&self) -> &Bytes {
        &self.revert_data
    }

    /// Returns the decoded revert reason, if it is a known escrow error.
    pub fn decoded_error(&self) -> Option<&str> {
        self.decoded_error.as_deref()
    }

    /// Returns the failed transaction, if the revert was mined.
    pub const fn tx_hash(&self) -> Option<B256> {
        self.tx_hash
    }

    /// Whether the call was rejected because the transfer id is already taken.
    ///
    /// This is how a double submission of the same create or lock surfaces.
    pub const fn is_already_exists(&self) -> bool {
        self.already_exists
    }
}
