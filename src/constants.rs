//! Escrow driver constants.

use alloy::primitives::{Address, address};

/// Largest amount representable by the escrow's `uint96` amount field.
pub const MAX_UINT96: u128 = (1u128 << 96) - 1;

/// Largest timestamp representable by the escrow's `uint40` expiry field.
pub const MAX_UINT40: u64 = (1u64 << 40) - 1;

/// Default lifetime of a transfer, applied when the request carries no expiry.
pub const DEFAULT_EXPIRY_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Default salt version mixed into recipient hashes.
///
/// Bumping this separates deployments: the same email hashes differently under a new version.
pub const DEFAULT_SALT_VERSION: &str = "email-escrow:v1";

/// The public Base Mainnet RPC URL.
///
/// This endpoint is rate-limited.
/// See also <https://docs.base.org/chain/network-information>
pub const BASE_MAINNET_PUBLIC_RPC_URL: &str = "https://mainnet.base.org";

/// The public Base Sepolia RPC URL.
///
/// This endpoint is rate-limited.
/// See also <https://docs.base.org/chain/network-information>
pub const BASE_SEPOLIA_PUBLIC_RPC_URL: &str = "https://sepolia.base.org";

/// USDC on Base Mainnet.
pub const BASE_MAINNET_USDC: Address = address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

/// USDC on Base Sepolia.
pub const BASE_SEPOLIA_USDC: Address = address!("0x036CbD53842c5426634e7929541eC2318f3dCF7e");
