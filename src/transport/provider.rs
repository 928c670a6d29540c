//! Alloy backed chain access.

use super::{
    EscrowRpc, TransactionSubmitter,
    error::{call_error, send_error},
};
use crate::{
    error::{EscrowError, EscrowRevert},
    signers::DynSigner,
    types::UnsignedCall,
};
use alloy::{
    network::{EthereumWallet, ReceiptResponse},
    primitives::{Address, B256, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
};
use tracing::{debug, instrument, warn};
use url::Url;

/// [`EscrowRpc`] over an alloy provider.
#[derive(Debug, Clone)]
pub struct ProviderRpc {
    provider: DynProvider,
}

impl ProviderRpc {
    /// Creates a new instance of [`ProviderRpc`].
    pub const fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// Connects to an HTTP endpoint.
    pub fn connect_http(url: Url) -> Self {
        Self::new(ProviderBuilder::new().connect_http(url).erased())
    }
}

#[async_trait::async_trait]
impl EscrowRpc for ProviderRpc {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, EscrowError> {
        let request = TransactionRequest::default().to(to).input(input.into());
        self.provider.call(request).await.map_err(call_error)
    }
}

/// [`TransactionSubmitter`] signing with a relayer key.
///
/// Every call is simulated with `eth_call` first, so contract reverts are reported before
/// anything is broadcast.
#[derive(Debug, Clone)]
pub struct RelayerSubmitter {
    /// Provider with the relayer wallet attached.
    provider: DynProvider,
    /// Relayer address.
    address: Address,
}

impl RelayerSubmitter {
    /// Creates a new [`RelayerSubmitter`] sending through `rpc_url`.
    pub fn new(signer: DynSigner, rpc_url: Url) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer.0))
            .connect_http(rpc_url)
            .erased();
        Self { provider, address }
    }
}

#[async_trait::async_trait]
impl TransactionSubmitter for RelayerSubmitter {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip_all, fields(to = %call.to, relayer = %self.address))]
    async fn submit(&self, call: UnsignedCall) -> Result<B256, EscrowError> {
        let request = TransactionRequest::default()
            .from(self.address)
            .to(call.to)
            .input(call.input.into())
            .value(call.value);

        // Try eth_call before committing to send the actual transaction
        self.provider.call(request.clone()).await.map_err(call_error)?;

        let pending = self.provider.send_transaction(request).await.map_err(send_error)?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "Broadcast escrow transaction");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|err| EscrowError::ambiguous(Some(tx_hash), err))?;
        if !receipt.status() {
            warn!(%tx_hash, "Escrow transaction reverted on-chain");
            return Err(EscrowRevert::mined(tx_hash).into());
        }

        Ok(tx_hash)
    }
}
