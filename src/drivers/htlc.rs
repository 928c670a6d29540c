//! Driver for the hash-lock escrow.

use super::{EscrowClients, EscrowContext, now};
use crate::{
    config::{EscrowConfig, keys},
    error::EscrowError,
    identifiers::{derive_hash_lock, derive_transfer_id, generate_secret},
    reader::EscrowReader,
    types::{
        CancelReceipt, ClaimReceipt, HtlcCreationReceipt, HtlcLock, HtlcStatus, IHashLockEscrow,
        RefundReceipt, Secret, TransferRequest, U96, UnsignedCall,
    },
};
use alloy::primitives::{Address, B256};
use tracing::{debug, info, instrument};

/// Locks tokens behind the hash of a random secret.
///
/// The email address in a request only routes the secret to its recipient; it is not part of
/// anything stored on-chain. Whoever presents the secret before expiry can have the funds
/// released to any address.
#[derive(Debug, Clone)]
pub struct HtlcEscrowDriver {
    ctx: EscrowContext,
}

impl HtlcEscrowDriver {
    /// Creates a new driver.
    pub fn new(config: &EscrowConfig, clients: EscrowClients) -> Self {
        Self {
            ctx: EscrowContext::new(config, config.htlc_escrow, keys::HTLC_ESCROW, "htlc", clients),
        }
    }

    /// Returns the escrow contract address, if configured.
    pub fn escrow(&self) -> Option<Address> {
        self.ctx.escrow
    }

    /// Returns the underlying read client.
    pub fn reader(&self) -> &EscrowReader {
        &self.ctx.reader
    }

    /// Locks tokens behind a freshly generated secret.
    ///
    /// The returned receipt is the only place the secret exists; it is up to the caller to
    /// deliver it to the recipient.
    #[instrument(skip_all, fields(network = %self.ctx.chain.network))]
    pub async fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<HtlcCreationReceipt, EscrowError> {
        let transfer = self.ctx.prepare(&request, now())?;
        let secret = generate_secret();
        let hash_lock = derive_hash_lock(&secret);
        let transfer_id = derive_transfer_id(hash_lock, transfer.amount, transfer.expiry);
        debug!(%transfer_id, %hash_lock, amount = %transfer.amount, "Derived lock");

        let call = self.ctx.call(
            transfer.escrow,
            IHashLockEscrow::lockCall {
                token: transfer.token,
                from: transfer.from,
                amount: transfer.amount,
                hashLock: hash_lock,
                expiry: transfer.expiry,
            },
        );
        let submission = self.ctx.dispatch(call).await?;
        info!(%transfer_id, submitted = submission.tx_hash().is_some(), "Locked transfer");

        Ok(HtlcCreationReceipt {
            transfer_id,
            hash_lock,
            secret,
            token: transfer.token,
            from: transfer.from,
            amount: transfer.amount,
            expiry: transfer.expiry,
            submission,
        })
    }

    /// Releases a pending lock to `recipient`, with the relayer paying gas.
    ///
    /// The secret is checked against the stored hash lock first so that a wrong secret never
    /// costs a transaction.
    #[instrument(skip(self, secret), fields(network = %self.ctx.chain.network))]
    pub async fn claim_to_recipient(
        &self,
        transfer_id: B256,
        secret: &Secret,
        recipient: Address,
    ) -> Result<ClaimReceipt, EscrowError> {
        self.ctx.submitter()?;
        let escrow = self.ctx.escrow()?;

        let lock = self.pending_lock(transfer_id).await?;
        if lock.hash_lock != secret.hash_lock() {
            return Err(EscrowError::SecretMismatch(transfer_id));
        }

        let call = self.ctx.call(
            escrow,
            IHashLockEscrow::claimToCall {
                transferId: transfer_id,
                secret: *secret.expose(),
                recipient,
            },
        );
        let tx_hash = self.ctx.submit(call).await?;
        self.ctx.metrics.claimed.increment(1);
        info!(%tx_hash, "Claimed lock");

        Ok(ClaimReceipt { transfer_id, recipient, tx_hash })
    }

    /// Returns the funds of an expired lock to its sender.
    #[instrument(skip(self), fields(network = %self.ctx.chain.network))]
    pub async fn refund_transfer(&self, transfer_id: B256) -> Result<RefundReceipt, EscrowError> {
        self.ctx.submitter()?;
        let escrow = self.ctx.escrow()?;
        self.pending_lock(transfer_id).await?;

        let call =
            self.ctx.call(escrow, IHashLockEscrow::refundCall { transferId: transfer_id });
        let tx_hash = self.ctx.submit(call).await?;
        self.ctx.metrics.refunded.increment(1);
        info!(%tx_hash, "Refunded lock");

        Ok(RefundReceipt { transfer_id, tx_hash })
    }

    /// Withdraws a pending lock before it is claimed.
    #[instrument(skip(self), fields(network = %self.ctx.chain.network))]
    pub async fn cancel_transfer(&self, transfer_id: B256) -> Result<CancelReceipt, EscrowError> {
        self.ctx.submitter()?;
        let escrow = self.ctx.escrow()?;
        self.pending_lock(transfer_id).await?;

        let call =
            self.ctx.call(escrow, IHashLockEscrow::cancelCall { transferId: transfer_id });
        let tx_hash = self.ctx.submit(call).await?;
        self.ctx.metrics.cancelled.increment(1);
        info!(%tx_hash, "Cancelled lock");

        Ok(CancelReceipt { transfer_id, tx_hash })
    }

    /// Reads the status of a lock, `None` if it was never created.
    pub async fn get_transfer_status(
        &self,
        transfer_id: B256,
    ) -> Result<Option<HtlcStatus>, EscrowError> {
        let escrow = self.ctx.escrow()?;
        HtlcStatus::from_code(self.ctx.reader.htlc_status_code(escrow, transfer_id).await?)
    }

    /// Reads the statuses of several locks concurrently, in the order given.
    pub async fn get_transfer_statuses(
        &self,
        transfer_ids: &[B256],
    ) -> Result<Vec<Option<HtlcStatus>>, EscrowError> {
        let escrow = self.ctx.escrow()?;
        self.ctx
            .reader
            .htlc_status_codes(escrow, transfer_ids)
            .await?
            .into_iter()
            .map(HtlcStatus::from_code)
            .collect()
    }

    /// Reads a lock, `None` if it was never created.
    pub async fn load_lock(&self, transfer_id: B256) -> Result<Option<HtlcLock>, EscrowError> {
        let escrow = self.ctx.escrow()?;
        HtlcLock::from_onchain(transfer_id, self.ctx.reader.htlc_lock(escrow, transfer_id).await?)
    }

    /// Builds the approval the funding wallet must execute before `amount` can be locked.
    pub fn approval_call(
        &self,
        token: Option<Address>,
        amount: U96,
    ) -> Result<UnsignedCall, EscrowError> {
        self.ctx.approval_call(token, amount)
    }

    async fn pending_lock(&self, transfer_id: B256) -> Result<HtlcLock, EscrowError> {
        let lock =
            self.load_lock(transfer_id).await?.ok_or(EscrowError::TransferNotFound(transfer_id))?;
        if lock.status != HtlcStatus::Pending {
            return Err(EscrowError::TransferNotOpen {
                transfer_id,
                status: lock.status.to_string(),
            });
        }
        Ok(lock)
    }
}
