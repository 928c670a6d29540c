//! Shared primitive types.
use alloy::primitives::Uint;

mod commitment;
pub use commitment::*;

mod erc20;
pub use erc20::*;

mod htlc;
pub use htlc::*;

mod receipt;
pub use receipt::*;

mod request;
pub use request::*;

mod secret;
pub use secret::*;

mod state;
pub use state::*;

/// A 40 bit integer, the width of on-chain expiry timestamps.
pub type U40 = Uint<40, 1>;

/// A 96 bit integer, the width of on-chain escrow amounts.
pub type U96 = Uint<96, 2>;
