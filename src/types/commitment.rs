//! Commitment escrow contract types and interfaces.
//!
//! A commitment escrow binds a transfer to the salted hash of the recipient's email. The
//! contract checks the hash supplied at claim time against the one committed at creation.

use alloy::sol;
use serde::{Deserialize, Serialize};

sol! {
    /// An EIP-2612 permit forwarded to the token by `createTransfer`.
    ///
    /// The driver always sends it disabled: funds are pulled from a treasury that has approved
    /// the escrow beforehand.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct PermitSignature {
        /// Whether the contract should call `permit` before pulling funds.
        bool enabled;
        /// Permit deadline.
        uint256 deadline;
        /// Signature recovery id.
        uint8 v;
        /// Signature `r` value.
        bytes32 r;
        /// Signature `s` value.
        bytes32 s;
    }

    /// A commitment transfer as stored by the escrow.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct CommitmentTransfer {
        /// Address the funds were pulled from.
        address sender;
        /// Escrowed token.
        address token;
        /// Escrowed amount in atomic units.
        uint96 amount;
        /// Salted hash of the recipient email.
        bytes32 recipientHash;
        /// Timestamp after which the transfer can no longer be claimed.
        uint40 expiry;
        /// Raw status code, see [`crate::types::CommitmentStatus`].
        uint8 status;
    }

    #[derive(Debug)]
    contract ICommitmentEscrow {
        /// A transfer with this id already exists.
        error TransferAlreadyExists(bytes32 transferId);

        /// No transfer with this id exists.
        error TransferNotFound(bytes32 transferId);

        /// The recipient hash does not match the committed one.
        error InvalidRecipientHash();

        /// The transfer expired and can only be refunded.
        error TransferExpired();

        /// The transfer has not expired yet.
        error TransferNotExpired();

        /// The transfer is not in the status required by the operation.
        error InvalidStatus();

        /// Pulls `amount` of `token` from `from` and locks it under `recipientHash`.
        ///
        /// The transfer id is `keccak256(abi.encodePacked(recipientHash, amount, expiry))`.
        function createTransfer(
            address token,
            address from,
            uint96 amount,
            bytes32 recipientHash,
            uint40 expiry,
            PermitSignature calldata permit
        ) external returns (bytes32 transferId);

        /// Releases the transfer to `recipient` if `recipientHash` matches the commitment.
        function claim(bytes32 transferId, address recipient, bytes32 recipientHash) external;

        /// Returns the escrowed funds to `refundTo`.
        function refund(bytes32 transferId, address refundTo) external;

        /// Returns the stored transfer, zeroed if it was never created.
        function getTransfer(bytes32 transferId) external view returns (CommitmentTransfer memory);
    }
}
