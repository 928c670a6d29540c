//! An in-memory stand-in for the escrow contracts.
//!
//! Implements both chain seams, mirrors the contract rules the drivers depend on, and counts
//! every read and submission so tests can assert that a failing operation never hit the network.

use alloy::{
    primitives::{Address, B256, Bytes, U256, keccak256},
    sol_types::{SolError, SolInterface, SolValue},
};
use email_escrow::{
    chains::Network,
    config::EscrowConfig,
    drivers::{CommitmentEscrowDriver, EscrowClients, HtlcEscrowDriver},
    error::{EscrowError, EscrowRevert},
    identifiers::derive_transfer_id,
    transport::{EscrowRpc, TransactionSubmitter},
    types::{
        CommitmentTransfer, HashLockTransfer, ICommitmentEscrow, IERC20, IHashLockEscrow,
        UnsignedCall,
    },
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

pub const COMMITMENT_ESCROW: Address = Address::repeat_byte(0xc0);
pub const HTLC_ESCROW: Address = Address::repeat_byte(0xd0);
pub const TOKEN: Address = Address::repeat_byte(0x70);
pub const TREASURY: Address = Address::repeat_byte(0x7e);
pub const RELAYER: Address = Address::repeat_byte(0x11);
pub const RECIPIENT: Address = Address::repeat_byte(0x22);
pub const TOKEN_DECIMALS: u8 = 6;
pub const SALT_VERSION: &str = "test:v1";

#[derive(Debug, Default)]
struct State {
    commitments: HashMap<B256, CommitmentTransfer>,
    locks: HashMap<B256, HashLockTransfer>,
    /// Raw status codes returned by `getStatus` instead of the stored lock's.
    status_overrides: HashMap<B256, u8>,
    reads: usize,
    submissions: Vec<UnsignedCall>,
    /// Fails the next submission after broadcast.
    drop_next_receipt: bool,
}

/// The in-memory chain.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<State>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clients reading from this chain, with the relayer attached if `signed`.
    pub fn clients(&self, signed: bool) -> EscrowClients {
        EscrowClients {
            rpc: Arc::new(self.clone()),
            submitter: signed.then(|| Arc::new(self.clone()) as Arc<dyn TransactionSubmitter>),
        }
    }

    pub fn commitment_driver(&self, signed: bool) -> CommitmentEscrowDriver {
        CommitmentEscrowDriver::new(&config(), self.clients(signed))
    }

    pub fn htlc_driver(&self, signed: bool) -> HtlcEscrowDriver {
        HtlcEscrowDriver::new(&config(), self.clients(signed))
    }

    /// Number of `eth_call`s and submissions seen so far.
    pub fn network_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.reads + state.submissions.len()
    }

    pub fn submissions(&self) -> Vec<UnsignedCall> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn insert_commitment(&self, transfer_id: B256, transfer: CommitmentTransfer) {
        self.state.lock().unwrap().commitments.insert(transfer_id, transfer);
    }

    pub fn insert_lock(&self, transfer_id: B256, lock: HashLockTransfer) {
        self.state.lock().unwrap().locks.insert(transfer_id, lock);
    }

    pub fn override_status(&self, transfer_id: B256, code: u8) {
        self.state.lock().unwrap().status_overrides.insert(transfer_id, code);
    }

    pub fn drop_next_receipt(&self) {
        self.state.lock().unwrap().drop_next_receipt = true;
    }

    fn read(&self, to: Address, input: &[u8]) -> Result<Vec<u8>, EscrowError> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;

        if to == COMMITMENT_ESCROW {
            if let ICommitmentEscrow::ICommitmentEscrowCalls::getTransfer(call) =
                ICommitmentEscrow::ICommitmentEscrowCalls::abi_decode(input)?
            {
                let transfer =
                    state.commitments.get(&call.transferId).cloned().unwrap_or_default();
                return Ok(transfer.abi_encode());
            }
        } else if to == HTLC_ESCROW {
            match IHashLockEscrow::IHashLockEscrowCalls::abi_decode(input)? {
                IHashLockEscrow::IHashLockEscrowCalls::getLock(call) => {
                    let lock = state.locks.get(&call.transferId).cloned().unwrap_or_default();
                    return Ok(lock.abi_encode());
                }
                IHashLockEscrow::IHashLockEscrowCalls::getStatus(call) => {
                    let code = match state.status_overrides.get(&call.transferId) {
                        Some(code) => *code,
                        None => state.locks.get(&call.transferId).map_or(0, |lock| lock.status),
                    };
                    return Ok(U256::from(code).abi_encode());
                }
                _ => {}
            }
        } else if to == TOKEN {
            if let IERC20::IERC20Calls::decimals(_) = IERC20::IERC20Calls::abi_decode(input)? {
                return Ok(U256::from(TOKEN_DECIMALS).abi_encode());
            }
        }

        Err(EscrowError::transport(format!("unexpected read of {to}")))
    }

    fn execute(&self, call: &UnsignedCall) -> Result<(), EscrowError> {
        let mut state = self.state.lock().unwrap();

        if call.to == COMMITMENT_ESCROW {
            match ICommitmentEscrow::ICommitmentEscrowCalls::abi_decode(&call.input)? {
                ICommitmentEscrow::ICommitmentEscrowCalls::createTransfer(create) => {
                    let id = derive_transfer_id(create.recipientHash, create.amount, create.expiry);
                    if state.commitments.contains_key(&id) {
                        return Err(revert(ICommitmentEscrow::TransferAlreadyExists {
                            transferId: id,
                        }));
                    }
                    state.commitments.insert(
                        id,
                        CommitmentTransfer {
                            sender: create.from,
                            token: create.token,
                            amount: create.amount,
                            recipientHash: create.recipientHash,
                            expiry: create.expiry,
                            status: 1,
                        },
                    );
                }
                ICommitmentEscrow::ICommitmentEscrowCalls::claim(claim) => {
                    let transfer = state.commitments.get_mut(&claim.transferId).ok_or_else(|| {
                        revert(ICommitmentEscrow::TransferNotFound { transferId: claim.transferId })
                    })?;
                    if transfer.recipientHash != claim.recipientHash {
                        return Err(revert(ICommitmentEscrow::InvalidRecipientHash {}));
                    }
                    if transfer.status != 1 {
                        return Err(revert(ICommitmentEscrow::InvalidStatus {}));
                    }
                    transfer.status = 2;
                }
                ICommitmentEscrow::ICommitmentEscrowCalls::refund(refund) => {
                    let transfer =
                        state.commitments.get_mut(&refund.transferId).ok_or_else(|| {
                            revert(ICommitmentEscrow::TransferNotFound {
                                transferId: refund.transferId,
                            })
                        })?;
                    if transfer.status != 1 {
                        return Err(revert(ICommitmentEscrow::InvalidStatus {}));
                    }
                    transfer.status = 3;
                }
                ICommitmentEscrow::ICommitmentEscrowCalls::getTransfer(_) => {}
            }
            return Ok(());
        }

        if call.to == HTLC_ESCROW {
            match IHashLockEscrow::IHashLockEscrowCalls::abi_decode(&call.input)? {
                IHashLockEscrow::IHashLockEscrowCalls::lock(lock) => {
                    let id = derive_transfer_id(lock.hashLock, lock.amount, lock.expiry);
                    if state.locks.contains_key(&id) {
                        return Err(revert(IHashLockEscrow::LockAlreadyExists { transferId: id }));
                    }
                    state.locks.insert(
                        id,
                        HashLockTransfer {
                            sender: lock.from,
                            token: lock.token,
                            amount: lock.amount,
                            hashLock: lock.hashLock,
                            expiry: lock.expiry,
                            status: 1,
                        },
                    );
                }
                IHashLockEscrow::IHashLockEscrowCalls::claimTo(claim) => {
                    let lock = pending_lock(&mut state, claim.transferId)?;
                    if keccak256(claim.secret) != lock.hashLock {
                        return Err(revert(IHashLockEscrow::InvalidSecret {}));
                    }
                    lock.status = 2;
                }
                IHashLockEscrow::IHashLockEscrowCalls::refund(refund) => {
                    pending_lock(&mut state, refund.transferId)?.status = 3;
                }
                IHashLockEscrow::IHashLockEscrowCalls::cancel(cancel) => {
                    pending_lock(&mut state, cancel.transferId)?.status = 4;
                }
                _ => {}
            }
            return Ok(());
        }

        Err(EscrowError::transport(format!("unexpected submission to {}", call.to)))
    }
}

fn pending_lock(state: &mut State, transfer_id: B256) -> Result<&mut HashLockTransfer, EscrowError> {
    let lock = state
        .locks
        .get_mut(&transfer_id)
        .ok_or_else(|| revert(IHashLockEscrow::LockNotFound { transferId: transfer_id }))?;
    if lock.status != 1 {
        return Err(revert(IHashLockEscrow::InvalidStatus {}));
    }
    Ok(lock)
}

fn revert(err: impl SolError) -> EscrowError {
    EscrowRevert::new(err.abi_encode().into()).into()
}

#[async_trait::async_trait]
impl EscrowRpc for MockChain {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, EscrowError> {
        self.read(to, &input).map(Into::into)
    }
}

#[async_trait::async_trait]
impl TransactionSubmitter for MockChain {
    fn address(&self) -> Address {
        RELAYER
    }

    async fn submit(&self, call: UnsignedCall) -> Result<B256, EscrowError> {
        let tx_hash = {
            let mut state = self.state.lock().unwrap();
            state.submissions.push(call.clone());
            let nonce = U256::from(state.submissions.len());
            keccak256([&call.input[..], &nonce.to_be_bytes::<32>()[..]].concat())
        };

        self.execute(&call)?;

        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.drop_next_receipt) {
            return Err(EscrowError::ambiguous(Some(tx_hash), "receipt request timed out"));
        }
        Ok(tx_hash)
    }
}

/// Configuration pointing at the mock contracts.
pub fn config() -> EscrowConfig {
    EscrowConfig::new(Network::BaseSepolia)
        .with_commitment_escrow(Some(COMMITMENT_ESCROW))
        .with_htlc_escrow(Some(HTLC_ESCROW))
        .with_token(Some(TOKEN))
        .with_treasury(Some(TREASURY))
        .with_expiry_window(Duration::from_secs(3_600))
        .with_salt_version(SALT_VERSION)
}

/// Current unix time in seconds.
pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}
