use alloy::primitives::{B256, hex, keccak256};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The preimage of an HTLC hash lock.
///
/// Whoever holds the secret can direct the locked funds to any address, so it is treated as a
/// bearer credential: [`Debug`] never prints it and it is never recorded in tracing spans. It is
/// only exposed through [`Secret::expose`] and serialization of the creation receipt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(B256);

impl Secret {
    /// Generates a fresh secret from the thread-local CSPRNG.
    pub fn random() -> Self {
        let mut secret = B256::ZERO;
        rand::rng().fill_bytes(secret.as_mut_slice());
        Self(secret)
    }

    /// Wraps existing secret bytes, e.g. ones delivered to a recipient out of band.
    pub const fn from_bytes(bytes: B256) -> Self {
        Self(bytes)
    }

    /// Returns the raw secret.
    pub const fn expose(&self) -> &B256 {
        &self.0
    }

    /// Returns `keccak256(secret)`.
    pub fn hash_lock(&self) -> B256 {
        keccak256(self.0)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl FromStr for Secret {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Self)
    }
}
