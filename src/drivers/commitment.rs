//! Driver for the commitment escrow.

use super::{EscrowClients, EscrowContext, now};
use crate::{
    config::{EscrowConfig, keys},
    error::EscrowError,
    identifiers::{derive_recipient_hash, derive_transfer_id, normalize_email, salt_version_digest},
    reader::EscrowReader,
    types::{
        ClaimReceipt, CommitmentStatus, ICommitmentEscrow, PermitSignature, RefundReceipt,
        TransferCreationReceipt, TransferRequest, TransferState, U40, U96, UnsignedCall,
    },
};
use alloy::primitives::{Address, B256};
use tracing::{debug, info, instrument};

/// Creates, claims and refunds transfers bound to a salted hash of the recipient's email.
///
/// Lifecycle of a transfer: `NONE → CREATED → {CLAIMED | REFUNDED | EXPIRED}`, where `EXPIRED`
/// is a read-time classification of a `CREATED` transfer past its expiry.
#[derive(Debug, Clone)]
pub struct CommitmentEscrowDriver {
    ctx: EscrowContext,
    salt_digest: B256,
}

impl CommitmentEscrowDriver {
    /// Creates a new driver.
    ///
    /// Without a submitter, [`create_transfer`](Self::create_transfer) returns unsigned calls and
    /// claims and refunds fail with [`EscrowError::SignerNotConfigured`].
    pub fn new(config: &EscrowConfig, clients: EscrowClients) -> Self {
        Self {
            ctx: EscrowContext::new(
                config,
                config.commitment_escrow,
                keys::COMMITMENT_ESCROW,
                "commitment",
                clients,
            ),
            salt_digest: salt_version_digest(&config.salt_version),
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

    /// Returns the recipient hash of an email under the configured salt version.
    pub fn recipient_hash(&self, email: &str) -> B256 {
        derive_recipient_hash(self.salt_digest, &normalize_email(email))
    }

    /// Recomputes the id of the transfer for `email`, `amount` and `expiry`.
    pub fn transfer_id(&self, email: &str, amount: U96, expiry: U40) -> B256 {
        derive_transfer_id(self.recipient_hash(email), amount, expiry)
    }

    /// Escrows tokens for the owner of an email address.
    ///
    /// All validation happens before any network call. With a relayer the call is submitted and
    /// mined; otherwise it is returned for the caller to sign.
    #[instrument(skip_all, fields(network = %self.ctx.chain.network))]
    pub async fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferCreationReceipt, EscrowError> {
        let transfer = self.ctx.prepare(&request, now())?;
        let recipient_hash = self.recipient_hash(&request.email);
        let transfer_id = derive_transfer_id(recipient_hash, transfer.amount, transfer.expiry);
        debug!(%transfer_id, %recipient_hash, amount = %transfer.amount, "Derived transfer");

        let call = self.ctx.call(
            transfer.escrow,
            ICommitmentEscrow::createTransferCall {
                token: transfer.token,
                from: transfer.from,
                amount: transfer.amount,
                recipientHash: recipient_hash,
                expiry: transfer.expiry,
                permit: PermitSignature::default(),
            },
        );
        let submission = self.ctx.dispatch(call).await?;
        info!(%transfer_id, submitted = submission.tx_hash().is_some(), "Created transfer");

        Ok(TransferCreationReceipt {
            transfer_id,
            recipient_hash,
            token: transfer.token,
            from: transfer.from,
            amount: transfer.amount,
            expiry: transfer.expiry,
            submission,
        })
    }

    /// Releases a transfer to `recipient`, proving ownership of `recipient_email`.
    ///
    /// The transfer is re-read first: it must exist, still be claimable and be committed to the
    /// same recipient hash.
    #[instrument(skip(self, recipient_email), fields(network = %self.ctx.chain.network))]
    pub async fn claim_transfer(
        &self,
        transfer_id: B256,
        recipient: Address,
        recipient_email: &str,
    ) -> Result<ClaimReceipt, EscrowError> {
        self.ctx.submitter()?;
        let escrow = self.ctx.escrow()?;
        let recipient_hash = self.recipient_hash(recipient_email);

        let state = self.open_transfer(transfer_id).await?;
        if state.status != CommitmentStatus::Created {
            return Err(EscrowError::TransferNotOpen {
                transfer_id,
                status: state.status.to_string(),
            });
        }
        if state.recipient_hash != recipient_hash {
            return Err(EscrowError::RecipientMismatch(transfer_id));
        }

        let call = self.ctx.call(
            escrow,
            ICommitmentEscrow::claimCall {
                transferId: transfer_id,
                recipient,
                recipientHash: recipient_hash,
            },
        );
        let tx_hash = self.ctx.submit(call).await?;
        self.ctx.metrics.claimed.increment(1);
        info!(%tx_hash, "Claimed transfer");

        Ok(ClaimReceipt { transfer_id, recipient, tx_hash })
    }

    /// Returns the funds of a transfer to `refund_address`.
    ///
    /// Whether the transfer may be refunded yet is up to the contract; the driver only checks
    /// that it exists and is not already settled.
    #[instrument(skip(self), fields(network = %self.ctx.chain.network))]
    pub async fn refund_transfer(
        &self,
        transfer_id: B256,
        refund_address: Address,
    ) -> Result<RefundReceipt, EscrowError> {
        self.ctx.submitter()?;
        let escrow = self.ctx.escrow()?;
        self.open_transfer(transfer_id).await?;

        let call = self.ctx.call(
            escrow,
            ICommitmentEscrow::refundCall { transferId: transfer_id, refundTo: refund_address },
        );
        let tx_hash = self.ctx.submit(call).await?;
        self.ctx.metrics.refunded.increment(1);
        info!(%tx_hash, "Refunded transfer");

        Ok(RefundReceipt { transfer_id, tx_hash })
    }

    /// Reads a transfer, `None` if it was never created.
    pub async fn load_onchain_state(
        &self,
        transfer_id: B256,
    ) -> Result<Option<TransferState>, EscrowError> {
        let escrow = self.ctx.escrow()?;
        let transfer = self.ctx.reader.commitment_transfer(escrow, transfer_id).await?;
        TransferState::from_onchain(transfer_id, transfer, now())
    }

    /// Checks whether `email` is the recipient a transfer is committed to.
    pub async fn verify_recipient(&self, transfer_id: B256, email: &str) -> Result<bool, EscrowError> {
        let state = self
            .load_onchain_state(transfer_id)
            .await?
            .ok_or(EscrowError::TransferNotFound(transfer_id))?;
        Ok(state.recipient_hash == self.recipient_hash(email))
    }

    /// Builds the approval the funding wallet must execute before `amount` can be escrowed.
    pub fn approval_call(
        &self,
        token: Option<Address>,
        amount: U96,
    ) -> Result<UnsignedCall, EscrowError> {
        self.ctx.approval_call(token, amount)
    }

    /// Reads a transfer that exists and has not been settled.
    async fn open_transfer(&self, transfer_id: B256) -> Result<TransferState, EscrowError> {
        let state = self
            .load_onchain_state(transfer_id)
            .await?
            .ok_or(EscrowError::TransferNotFound(transfer_id))?;
        if state.status.is_terminal() {
            return Err(EscrowError::TransferNotOpen {
                transfer_id,
                status: state.status.to_string(),
            });
        }
        Ok(state)
    }
}
