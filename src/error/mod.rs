//! Escrow driver error types.
use alloy::primitives::B256;
use thiserror::Error;

mod config;
pub use config::ConfigError;

mod revert;
pub use revert::EscrowRevert;

mod validation;
pub use validation::ValidationError;

/// The overarching error type returned by the escrow drivers.
///
/// Variants fall in three groups:
/// - local and deterministic ([`Validation`](Self::Validation), [`Config`](Self::Config),
///   [`SignerNotConfigured`](Self::SignerNotConfigured)), raised before any network call;
/// - definite on-chain outcomes, where the operation did not and will not happen;
/// - [`TransportFailure`](Self::TransportFailure), where the outcome may be unknown. See
///   [`EscrowError::is_ambiguous`].
#[derive(Debug, Error)]
pub enum EscrowError {
    /// The request failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Required configuration is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A state-changing call was attempted without a relayer signer.
    #[error("no relayer signer configured")]
    SignerNotConfigured,
    /// The contract reverted the call.
    #[error(transparent)]
    OnchainRejection(#[from] EscrowRevert),
    /// The RPC transport failed.
    ///
    /// If `ambiguous` is set a transaction may have reached the network and may still be mined.
    #[error("transport failure: {message}")]
    TransportFailure {
        /// Hash of the broadcast transaction, if it got that far.
        tx_hash: Option<B256>,
        /// Whether the outcome is unknown.
        ambiguous: bool,
        /// Underlying error message.
        message: String,
    },
    /// The contract returned a status code the driver does not know.
    #[error("unrecognized on-chain status code {0}")]
    UnrecognizedStatus(u8),
    /// The transfer does not exist on-chain.
    #[error("transfer {0} not found")]
    TransferNotFound(B256),
    /// The transfer is no longer in a state that allows the operation.
    #[error("transfer {transfer_id} is {status}")]
    TransferNotOpen {
        /// The transfer.
        transfer_id: B256,
        /// Its current status.
        status: String,
    },
    /// The supplied email does not hash to the committed recipient hash.
    #[error("recipient does not match the commitment of transfer {0}")]
    RecipientMismatch(B256),
    /// The supplied secret does not hash to the lock.
    #[error("secret does not match the hash lock of transfer {0}")]
    SecretMismatch(B256),
    /// The contract returned data that could not be decoded.
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
}

impl EscrowError {
    /// Creates a [`EscrowError::TransportFailure`] for an error with a definite outcome, e.g. a
    /// failed read or a submission the node refused.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::TransportFailure { tx_hash: None, ambiguous: false, message: err.to_string() }
    }

    /// Creates a [`EscrowError::TransportFailure`] for a submission whose outcome is unknown.
    pub fn ambiguous(tx_hash: Option<B256>, err: impl std::fmt::Display) -> Self {
        Self::TransportFailure { tx_hash, ambiguous: true, message: err.to_string() }
    }

    /// Whether the outcome of the failed operation is unknown.
    ///
    /// Callers must read the transfer state before retrying an operation that failed with an
    /// ambiguous error: the original submission may still land.
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::TransportFailure { ambiguous: true, .. })
    }

    /// Whether the error was raised locally, before any network call.
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Config(_) | Self::SignerNotConfigured)
    }
}
