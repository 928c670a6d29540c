//! # Email Escrow
//!
//! Drivers for two token escrows on Base addressed to email recipients:
//!
//! - the commitment escrow, where funds are bound to a salted hash of the recipient's email and
//!   released by a relayer once the recipient proves ownership of it;
//! - the HTLC escrow, where funds are locked behind the hash of a random secret that is delivered
//!   to the recipient out of band.

pub mod chains;
pub mod cli;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod identifiers;
pub mod metrics;
pub mod reader;
pub mod signers;
pub mod transport;
pub mod types;
pub mod units;
pub mod version;
