//! The supported networks and their parameters.
//!
//! Resolution is a static table lookup so that it can be verified offline; nothing here talks to
//! an RPC endpoint.

use crate::{
    constants::{
        BASE_MAINNET_PUBLIC_RPC_URL, BASE_MAINNET_USDC, BASE_SEPOLIA_PUBLIC_RPC_URL,
        BASE_SEPOLIA_USDC,
    },
    error::ConfigError,
};
use alloy::primitives::{Address, ChainId};
use alloy_chains::NamedChain;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A network the escrow is deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// Base Mainnet.
    Base,
    /// Base Sepolia.
    BaseSepolia,
}

impl Network {
    /// All supported networks.
    pub const ALL: [Self; 2] = [Self::Base, Self::BaseSepolia];

    /// Returns the canonical identifier of the network.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::BaseSepolia => "base-sepolia",
        }
    }

    /// Returns the named chain backing this network.
    pub const fn named_chain(&self) -> NamedChain {
        match self {
            Self::Base => NamedChain::Base,
            Self::BaseSepolia => NamedChain::BaseSepolia,
        }
    }

    /// Returns the chain parameters of this network.
    pub fn params(&self) -> ChainParams {
        let (rpc_url, default_token) = match self {
            Self::Base => (BASE_MAINNET_PUBLIC_RPC_URL, BASE_MAINNET_USDC),
            Self::BaseSepolia => (BASE_SEPOLIA_PUBLIC_RPC_URL, BASE_SEPOLIA_USDC),
        };
        ChainParams {
            network: *self,
            chain_id: self.named_chain() as ChainId,
            rpc_url: rpc_url.to_string(),
            default_token,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    /// Parses a network identifier or a decimal chain id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|network| {
                network.as_str() == id || (network.named_chain() as ChainId).to_string() == id
            })
            .ok_or_else(|| ConfigError::UnknownNetwork(s.to_string()))
    }
}

/// Parameters of a supported chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    /// The network.
    pub network: Network,
    /// The EIP-155 chain id.
    pub chain_id: ChainId,
    /// Default public RPC endpoint.
    pub rpc_url: String,
    /// Token escrowed when neither the request nor the configuration name one.
    pub default_token: Address,
}

/// Resolves a network identifier to its chain parameters.
pub fn resolve(network_id: &str) -> Result<ChainParams, ConfigError> {
    network_id.parse::<Network>().map(|network| network.params())
}
