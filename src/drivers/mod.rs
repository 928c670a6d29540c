//! Escrow transfer drivers.
//!
//! Both drivers share the same shape: they are built from an [`EscrowConfig`] plus the chain
//! seams, hold no per-transfer state, validate every request before touching the network, and
//! re-read on-chain state before any claim, refund or cancellation.

mod commitment;
pub use commitment::CommitmentEscrowDriver;

mod htlc;
pub use htlc::HtlcEscrowDriver;

use crate::{
    chains::ChainParams,
    config::{EscrowConfig, keys},
    error::{ConfigError, EscrowError, ValidationError},
    metrics::DriverMetrics,
    reader::EscrowReader,
    signers::DynSigner,
    transport::{EscrowRpc, ProviderRpc, RelayerSubmitter, TransactionSubmitter},
    types::{IERC20, Submission, TransferRequest, U40, U96, UnsignedCall},
    units::{to_atomic_amount, validate_amount, validate_expiry},
};
use alloy::{
    primitives::{Address, B256, U256},
    sol_types::SolCall,
};
use std::{sync::Arc, time::Duration};
use tracing::warn;

/// The chain seams a driver is built on.
#[derive(Debug, Clone)]
pub struct EscrowClients {
    /// Read access.
    pub rpc: Arc<dyn EscrowRpc>,
    /// Relayer submission, if a relayer key is configured.
    pub submitter: Option<Arc<dyn TransactionSubmitter>>,
}

impl EscrowClients {
    /// Connects to the configured RPC endpoint and loads the relayer key, if any.
    pub fn from_config(config: &EscrowConfig) -> eyre::Result<Self> {
        let rpc_url = config.rpc_url()?;
        let submitter = match &config.secrets.relayer_key {
            Some(key) => {
                let signer = DynSigner::load(key)?;
                Some(Arc::new(RelayerSubmitter::new(signer, rpc_url.clone()))
                    as Arc<dyn TransactionSubmitter>)
            }
            None => None,
        };
        Ok(Self { rpc: Arc::new(ProviderRpc::connect_http(rpc_url)), submitter })
    }
}

/// A validated creation request.
#[derive(Debug, Clone, Copy)]
struct PreparedTransfer {
    escrow: Address,
    token: Address,
    from: Address,
    amount: U96,
    expiry: U40,
}

/// State shared by both drivers.
#[derive(Debug, Clone)]
struct EscrowContext {
    chain: ChainParams,
    escrow: Option<Address>,
    escrow_key: &'static str,
    token: Address,
    treasury: Option<Address>,
    expiry_window: Duration,
    reader: EscrowReader,
    submitter: Option<Arc<dyn TransactionSubmitter>>,
    metrics: DriverMetrics,
}

impl EscrowContext {
    fn new(
        config: &EscrowConfig,
        escrow: Option<Address>,
        escrow_key: &'static str,
        scheme: &'static str,
        clients: EscrowClients,
    ) -> Self {
        Self {
            chain: config.chain_params(),
            escrow,
            escrow_key,
            token: config.token(),
            treasury: config.treasury,
            expiry_window: config.expiry_window,
            reader: EscrowReader::new(clients.rpc),
            submitter: clients.submitter,
            metrics: DriverMetrics::for_scheme(scheme),
        }
    }

    fn escrow(&self) -> Result<Address, EscrowError> {
        self.escrow.ok_or(ConfigError::MissingConfiguration(self.escrow_key).into())
    }

    fn submitter(&self) -> Result<&Arc<dyn TransactionSubmitter>, EscrowError> {
        self.submitter.as_ref().ok_or(EscrowError::SignerNotConfigured)
    }

    /// Validates a creation request. Performs no I/O.
    fn prepare(&self, request: &TransferRequest, now: u64) -> Result<PreparedTransfer, EscrowError> {
        let amount = validate_amount(to_atomic_amount(&request.amount, request.decimals)?)?;
        let expiry = self.resolve_expiry(request.expiry, now)?;
        let escrow = self.escrow()?;
        let from = request
            .funding_wallet
            .or(self.treasury)
            .ok_or(ConfigError::MissingConfiguration(keys::TREASURY))?;
        let token = request.token.unwrap_or(self.token);
        Ok(PreparedTransfer { escrow, token, from, amount, expiry })
    }

    fn resolve_expiry(&self, requested: Option<u64>, now: u64) -> Result<U40, ValidationError> {
        let expiry =
            requested.unwrap_or_else(|| now.saturating_add(self.expiry_window.as_secs()));
        let encoded = validate_expiry(expiry)?;
        if expiry <= now {
            return Err(ValidationError::ExpiryInPast { expiry, now });
        }
        Ok(encoded)
    }

    /// Submits a creation call through the relayer, or hands it back unsigned.
    async fn dispatch(&self, call: UnsignedCall) -> Result<Submission, EscrowError> {
        let submission = match &self.submitter {
            Some(_) => Submission::Submitted { tx_hash: self.submit(call).await? },
            None => Submission::Unsigned(call),
        };
        self.metrics.created.increment(1);
        Ok(submission)
    }

    /// Submits a call through the relayer.
    async fn submit(&self, call: UnsignedCall) -> Result<B256, EscrowError> {
        let result = self.submitter()?.submit(call).await;
        if let Err(err) = &result {
            warn!(%err, ambiguous = err.is_ambiguous(), "Escrow submission failed");
            match err {
                EscrowError::OnchainRejection(_) => self.metrics.rejected.increment(1),
                EscrowError::TransportFailure { .. } => {
                    self.metrics.transport_failures.increment(1)
                }
                _ => {}
            }
        }
        result
    }

    fn call(&self, escrow: Address, call: impl SolCall) -> UnsignedCall {
        UnsignedCall { to: escrow, input: call.abi_encode().into(), value: U256::ZERO }
    }

    /// Builds the ERC-20 approval the funding wallet must execute before funds can be pulled.
    fn approval_call(
        &self,
        token: Option<Address>,
        amount: U96,
    ) -> Result<UnsignedCall, EscrowError> {
        let spender = self.escrow()?;
        let approve = IERC20::approveCall { spender, amount: U256::from(amount.to::<u128>()) };
        Ok(self.call(token.unwrap_or(self.token), approve))
    }
}

/// Current unix time in seconds.
fn now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
