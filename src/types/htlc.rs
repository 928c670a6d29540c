//! Hash-time-locked escrow contract types and interfaces.

use alloy::sol;
use serde::{Deserialize, Serialize};

sol! {
    /// A hash-locked transfer as stored by the escrow.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct HashLockTransfer {
        /// Address the funds were pulled from.
        address sender;
        /// Escrowed token.
        address token;
        /// Escrowed amount in atomic units.
        uint96 amount;
        /// `keccak256(secret)`.
        bytes32 hashLock;
        /// Timestamp after which the transfer can be refunded.
        uint40 expiry;
        /// Raw status code, see [`crate::types::HtlcStatus`].
        uint8 status;
    }

    #[derive(Debug)]
    contract IHashLockEscrow {
        /// A lock with this id already exists.
        error LockAlreadyExists(bytes32 transferId);

        /// No lock with this id exists.
        error LockNotFound(bytes32 transferId);

        /// The revealed secret does not hash to the lock.
        error InvalidSecret();

        /// The lock expired and can only be refunded.
        error LockExpired();

        /// The lock has not expired yet.
        error LockNotExpired();

        /// The lock is not pending.
        error InvalidStatus();

        /// Pulls `amount` of `token` from `from` and locks it under `hashLock`.
        ///
        /// The transfer id is `keccak256(abi.encodePacked(hashLock, amount, expiry))`.
        function lock(
            address token,
            address from,
            uint96 amount,
            bytes32 hashLock,
            uint40 expiry
        ) external returns (bytes32 transferId);

        /// Releases the lock to `recipient` given the preimage of its hash lock.
        ///
        /// Anyone holding the secret may call this, which lets a relayer pay gas on behalf of the
        /// recipient.
        function claimTo(bytes32 transferId, bytes32 secret, address recipient) external;

        /// Returns the funds to the sender after expiry.
        function refund(bytes32 transferId) external;

        /// Returns the funds to the sender before the lock is claimed.
        function cancel(bytes32 transferId) external;

        /// Returns the stored lock, zeroed if it was never created.
        function getLock(bytes32 transferId) external view returns (HashLockTransfer memory);

        /// Returns the raw status code of a lock.
        function getStatus(bytes32 transferId) external view returns (uint8);
    }
}
