//! Relayer key loading.
use alloy::{
    network::{FullSigner, TxSigner},
    primitives::{Address, Signature},
    signers::{
        k256::ecdsa::SigningKey,
        local::{
            PrivateKeySigner,
            coins_bip39::{English, Mnemonic},
        },
    },
};
use std::{fmt, str::FromStr, sync::Arc};

/// The relayer's transaction signer.
#[derive(Clone)]
pub struct DynSigner(pub Arc<dyn FullSigner<Signature> + Send + Sync>);

impl fmt::Debug for DynSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelayerSigner").field(&self.address()).finish()
    }
}

impl DynSigner {
    /// Derives the signer at `index` from a mnemonic.
    pub fn derive_from_mnemonic(mnemonic: &Mnemonic<English>, index: usize) -> eyre::Result<Self> {
        let path = format!("m/44'/60'/0'/0/{index}");
        let key = mnemonic.derive_key(path.as_str(), None)?;
        let key: &SigningKey = key.as_ref();
        Ok(Self(Arc::new(PrivateKeySigner::from_signing_key(key.clone()))))
    }

    /// Loads a hex encoded private key.
    pub fn from_signing_key(key: &str) -> eyre::Result<Self> {
        Ok(Self(Arc::new(PrivateKeySigner::from_str(key)?)))
    }

    /// Loads a relayer key given either as a hex private key or as a mnemonic phrase, in which
    /// case the first account is used.
    pub fn load(key: &str) -> eyre::Result<Self> {
        if let Ok(signer) = Self::from_signing_key(key) {
            return Ok(signer);
        }
        let mnemonic = Mnemonic::<English>::new_from_phrase(key.trim())
            .map_err(|_| eyre::eyre!("relayer key is neither a private key nor a mnemonic"))?;
        Self::derive_from_mnemonic(&mnemonic, 0)
    }

    /// Returns the signer's Ethereum Address.
    pub fn address(&self) -> Address {
        TxSigner::address(&self.0)
    }
}
