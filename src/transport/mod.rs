//! The seams between the drivers and the chain.
//!
//! Drivers only ever talk to the chain through [`EscrowRpc`] for reads and
//! [`TransactionSubmitter`] for relayer-signed writes. The alloy backed implementations live in
//! this module; tests substitute their own.

use crate::{error::EscrowError, types::UnsignedCall};
use alloy::primitives::{Address, B256, Bytes};
use std::fmt;

pub mod error;

mod provider;
pub use provider::{ProviderRpc, RelayerSubmitter};

/// Read-only access to contract state.
#[async_trait::async_trait]
pub trait EscrowRpc: fmt::Debug + Send + Sync {
    /// Executes an `eth_call` of `input` against `to` at the latest block.
    ///
    /// A revert is returned as [`EscrowError::OnchainRejection`], any other failure as a
    /// non-ambiguous [`EscrowError::TransportFailure`].
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, EscrowError>;
}

/// Signs and submits transactions on behalf of the relayer.
#[async_trait::async_trait]
pub trait TransactionSubmitter: fmt::Debug + Send + Sync {
    /// Returns the relayer address transactions are sent from.
    fn address(&self) -> Address;

    /// Submits `call` and waits for it to be mined.
    ///
    /// Returns the transaction hash of a successful transaction. Reverts, whether caught in
    /// simulation or mined, are returned as [`EscrowError::OnchainRejection`]; failures that leave
    /// the outcome unknown are ambiguous [`EscrowError::TransportFailure`]s.
    async fn submit(&self, call: UnsignedCall) -> Result<B256, EscrowError>;
}
