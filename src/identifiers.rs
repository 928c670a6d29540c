//! Derivation of recipient hashes, hash locks and transfer ids.
//!
//! Every id is recomputed by the escrow contract, so the encodings below must match it byte for
//! byte:
//!
//! - `recipientHash = keccak256(abi.encodePacked(keccak256(saltVersion), email))`
//! - `hashLock = keccak256(secret)`
//! - `transferId = keccak256(abi.encodePacked(bytes32 lock, uint96 amount, uint40 expiry))`
//!
//! Both escrow schemes share the transfer id encoding, with the recipient hash or the hash lock
//! as the lock value.

use crate::types::{Secret, U40, U96};
use alloy::primitives::{B256, keccak256};

/// Length of the packed transfer id preimage: 32 + 12 + 5 bytes.
const TRANSFER_ID_PREIMAGE_LEN: usize = 49;

/// Normalizes an email for hashing: surrounding whitespace trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the digest of a salt version string.
pub fn salt_version_digest(salt_version: &str) -> B256 {
    keccak256(salt_version.as_bytes())
}

/// Derives the recipient hash of an already normalized email.
pub fn derive_recipient_hash(salt_digest: B256, normalized_email: &str) -> B256 {
    keccak256([salt_digest.as_slice(), normalized_email.as_bytes()].concat())
}

/// Generates a fresh HTLC secret.
pub fn generate_secret() -> Secret {
    Secret::random()
}

/// Derives the hash lock of a secret.
pub fn derive_hash_lock(secret: &Secret) -> B256 {
    secret.hash_lock()
}

/// Derives the on-chain transfer id.
pub fn derive_transfer_id(lock: B256, amount: U96, expiry: U40) -> B256 {
    let mut preimage = [0u8; TRANSFER_ID_PREIMAGE_LEN];
    preimage[..32].copy_from_slice(lock.as_slice());
    preimage[32..44].copy_from_slice(&amount.to_be_bytes::<12>());
    preimage[44..].copy_from_slice(&expiry.to_be_bytes::<5>());
    keccak256(preimage)
}
