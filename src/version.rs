//! Escrow version.

/// The version of the escrow CLI.
pub const ESCROW_VERSION: &str = env!("CARGO_PKG_VERSION");
