//! Read access to escrow and token state.
//!
//! Every read goes to the chain; nothing is cached, so a read always reflects the latest block
//! the RPC endpoint has seen.

use crate::{
    error::EscrowError,
    transport::EscrowRpc,
    types::{CommitmentTransfer, HashLockTransfer, ICommitmentEscrow, IERC20, IHashLockEscrow},
};
use alloy::{
    primitives::{Address, B256},
    sol_types::SolCall,
};
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::trace;

/// Read client for escrow contracts.
#[derive(Debug, Clone)]
pub struct EscrowReader {
    rpc: Arc<dyn EscrowRpc>,
}

impl EscrowReader {
    /// Creates a new instance of [`EscrowReader`].
    pub fn new(rpc: Arc<dyn EscrowRpc>) -> Self {
        Self { rpc }
    }

    /// Calls a view function and decodes its return value.
    async fn read<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return, EscrowError> {
        trace!(%to, function = C::SIGNATURE, "Reading contract");
        let data = self.rpc.call(to, call.abi_encode().into()).await?;
        Ok(C::abi_decode_returns(&data)?)
    }

    /// Reads a commitment transfer. Unknown ids come back zeroed.
    pub async fn commitment_transfer(
        &self,
        escrow: Address,
        transfer_id: B256,
    ) -> Result<CommitmentTransfer, EscrowError> {
        self.read(escrow, ICommitmentEscrow::getTransferCall { transferId: transfer_id }).await
    }

    /// Reads an HTLC lock. Unknown ids come back zeroed.
    pub async fn htlc_lock(
        &self,
        escrow: Address,
        transfer_id: B256,
    ) -> Result<HashLockTransfer, EscrowError> {
        self.read(escrow, IHashLockEscrow::getLockCall { transferId: transfer_id }).await
    }

    /// Reads the raw status code of an HTLC lock.
    pub async fn htlc_status_code(
        &self,
        escrow: Address,
        transfer_id: B256,
    ) -> Result<u8, EscrowError> {
        self.read(escrow, IHashLockEscrow::getStatusCall { transferId: transfer_id }).await
    }

    /// Reads the raw status codes of several HTLC locks concurrently.
    pub async fn htlc_status_codes(
        &self,
        escrow: Address,
        transfer_ids: &[B256],
    ) -> Result<Vec<u8>, EscrowError> {
        try_join_all(transfer_ids.iter().map(|id| self.htlc_status_code(escrow, *id))).await
    }

    /// Reads the decimals of an ERC-20 token.
    pub async fn token_decimals(&self, token: Address) -> Result<u8, EscrowError> {
        self.read(token, IERC20::decimalsCall {}).await
    }
}
