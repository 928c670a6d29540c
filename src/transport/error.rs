//! Classification of RPC errors into [`EscrowError`]s.

use crate::error::{EscrowError, EscrowRevert};
use alloy::{primitives::Bytes, transports::TransportError};

/// Extension trait for [`TransportError`].
pub trait TransportErrExt {
    /// Whether the node refused a transaction because an identical one is already in its pool.
    fn is_already_known(&self) -> bool;

    /// Returns the revert data if the node reported an execution revert.
    fn revert_data(&self) -> Option<Bytes>;

    /// Returns true if the node answered with a JSON-RPC error, as opposed to the request failing
    /// in transit.
    fn is_error_resp(&self) -> bool;
}

impl TransportErrExt for TransportError {
    fn is_already_known(&self) -> bool {
        // see also: op-geth: https://github.com/ethereum-optimism/op-geth/blob/e666543dc5500428ee7c940e54263fe4968c5efd/core/txpool/legacypool/legacypool.go#L991-L993
        // reth: https://github.com/paradigmxyz/reth/blob/a3b749676c6c748bf977983c189f9f4c4f9e9fbe/crates/rpc/rpc-eth-types/src/error/mod.rs#L663-L665
        self.as_error_resp().map(|err| err.message == "already known").unwrap_or_default()
    }

    fn revert_data(&self) -> Option<Bytes> {
        self.as_error_resp().and_then(|err| err.as_revert_data())
    }

    fn is_error_resp(&self) -> bool {
        self.as_error_resp().is_some()
    }
}

/// Classifies an error from a read or a simulation.
pub(crate) fn call_error(err: TransportError) -> EscrowError {
    match err.revert_data() {
        Some(data) => EscrowRevert::new(data).into(),
        None => EscrowError::transport(err),
    }
}

/// Classifies an error from broadcasting a transaction.
///
/// Only an explicit refusal by the node is definite. A duplicate in the pool means an earlier
/// copy is in flight, and a failure in transit may have reached the node.
pub(crate) fn send_error(err: TransportError) -> EscrowError {
    if let Some(data) = err.revert_data() {
        return EscrowRevert::new(data).into();
    }
    if err.is_error_resp() && !err.is_already_known() {
        return EscrowError::transport(err);
    }
    EscrowError::ambiguous(None, err)
}
