//! Escrow driver configuration.
//!
//! Configuration is either loaded from a YAML file or assembled from a [`ConfigSource`], which
//! abstracts over where named values come from (environment, a map, a host application's
//! settings store). The drivers only ever see the resulting [`EscrowConfig`].
use crate::{
    chains::{ChainParams, Network},
    constants::{DEFAULT_EXPIRY_WINDOW_SECS, DEFAULT_SALT_VERSION},
    error::ConfigError,
};
use alloy::primitives::Address;
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, path::Path, str::FromStr, time::Duration};
use url::Url;

/// Names of the values read from a [`ConfigSource`].
pub mod keys {
    /// Network identifier, see [`crate::chains::resolve`].
    pub const NETWORK: &str = "NETWORK";
    /// RPC endpoint overriding the network default.
    pub const RPC_URL: &str = "RPC_URL";
    /// Commitment escrow contract address.
    pub const COMMITMENT_ESCROW: &str = "COMMITMENT_ESCROW";
    /// HTLC escrow contract address.
    pub const HTLC_ESCROW: &str = "HTLC_ESCROW";
    /// Token overriding the network default.
    pub const TOKEN: &str = "TOKEN";
    /// Treasury wallet funds are pulled from.
    pub const TREASURY: &str = "TREASURY";
    /// Default transfer lifetime in seconds.
    pub const EXPIRY_WINDOW_SECS: &str = "EXPIRY_WINDOW_SECS";
    /// Salt version mixed into recipient hashes.
    pub const SALT_VERSION: &str = "SALT_VERSION";
    /// Relayer private key or mnemonic.
    pub const RELAYER_KEY: &str = "RELAYER_KEY";
}

/// A provider of named configuration values.
pub trait ConfigSource {
    /// Returns the value of `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Reads configuration values from environment variables named `{prefix}{key}`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    /// The default prefix, e.g. `ESCROW_NETWORK`.
    pub const DEFAULT_PREFIX: &str = "ESCROW_";

    /// Creates a new [`EnvSource`] with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}{key}", self.prefix)).ok().filter(|value| !value.is_empty())
    }
}

/// Escrow driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Network the escrows are deployed on.
    pub network: Network,
    /// RPC endpoint. Defaults to the network's public endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<Url>,
    /// Commitment escrow address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment_escrow: Option<Address>,
    /// HTLC escrow address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htlc_escrow: Option<Address>,
    /// Token to escrow. Defaults to the network's default token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
    /// Treasury wallet funds are pulled from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury: Option<Address>,
    /// Lifetime of transfers created without an explicit expiry.
    #[serde(default = "default_expiry_window", with = "duration_secs")]
    pub expiry_window: Duration,
    /// Salt version mixed into recipient hashes.
    #[serde(default = "default_salt_version")]
    pub salt_version: String,
    /// Secrets.
    #[serde(skip_serializing, default)]
    pub secrets: SecretsConfig,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            network: Network::BaseSepolia,
            rpc_url: None,
            commitment_escrow: None,
            htlc_escrow: None,
            token: None,
            treasury: None,
            expiry_window: default_expiry_window(),
            salt_version: default_salt_version(),
            secrets: SecretsConfig::default(),
        }
    }
}

impl EscrowConfig {
    /// Creates a configuration for `network` with everything else defaulted.
    pub fn new(network: Network) -> Self {
        Self { network, ..Default::default() }
    }

    /// Sets the RPC endpoint.
    pub fn with_rpc_url(mut self, rpc_url: Option<Url>) -> Self {
        if let Some(rpc_url) = rpc_url {
            self.rpc_url = Some(rpc_url);
        }
        self
    }

    /// Sets the commitment escrow address.
    pub fn with_commitment_escrow(mut self, commitment_escrow: Option<Address>) -> Self {
        if let Some(commitment_escrow) = commitment_escrow {
            self.commitment_escrow = Some(commitment_escrow);
        }
        self
    }

    /// Sets the HTLC escrow address.
    pub fn with_htlc_escrow(mut self, htlc_escrow: Option<Address>) -> Self {
        if let Some(htlc_escrow) = htlc_escrow {
            self.htlc_escrow = Some(htlc_escrow);
        }
        self
    }

    /// Sets the escrowed token.
    pub fn with_token(mut self, token: Option<Address>) -> Self {
        if let Some(token) = token {
            self.token = Some(token);
        }
        self
    }

    /// Sets the treasury wallet.
    pub fn with_treasury(mut self, treasury: Option<Address>) -> Self {
        if let Some(treasury) = treasury {
            self.treasury = Some(treasury);
        }
        self
    }

    /// Sets the default transfer lifetime.
    pub fn with_expiry_window(mut self, expiry_window: Duration) -> Self {
        self.expiry_window = expiry_window;
        self
    }

    /// Sets the salt version.
    pub fn with_salt_version(mut self, salt_version: impl Into<String>) -> Self {
        self.salt_version = salt_version.into();
        self
    }

    /// Sets the relayer key.
    pub fn with_relayer_key(mut self, relayer_key: Option<String>) -> Self {
        self.secrets.relayer_key = relayer_key.or(self.secrets.relayer_key);
        self
    }

    /// Returns the parameters of the configured network.
    pub fn chain_params(&self) -> ChainParams {
        self.network.params()
    }

    /// Returns the RPC endpoint, falling back to the network's public endpoint.
    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(&self.chain_params().rpc_url).map_err(|err| {
                ConfigError::InvalidValue { key: keys::RPC_URL, reason: err.to_string() }
            }),
        }
    }

    /// Returns the token to escrow, falling back to the network default.
    pub fn token(&self) -> Address {
        self.token.unwrap_or_else(|| self.chain_params().default_token)
    }

    /// Assembles a configuration from named values.
    ///
    /// Only [`keys::NETWORK`] is required; addresses that are absent are reported by the drivers
    /// when an operation needs them.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let network = source
            .get(keys::NETWORK)
            .ok_or(ConfigError::MissingConfiguration(keys::NETWORK))?
            .parse::<Network>()?;

        let mut config = Self::new(network)
            .with_rpc_url(parse_opt(source, keys::RPC_URL)?)
            .with_commitment_escrow(parse_opt(source, keys::COMMITMENT_ESCROW)?)
            .with_htlc_escrow(parse_opt(source, keys::HTLC_ESCROW)?)
            .with_token(parse_opt(source, keys::TOKEN)?)
            .with_treasury(parse_opt(source, keys::TREASURY)?)
            .with_relayer_key(source.get(keys::RELAYER_KEY));

        if let Some(secs) = parse_opt::<u64>(source, keys::EXPIRY_WINDOW_SECS)? {
            config = config.with_expiry_window(Duration::from_secs(secs));
        }
        if let Some(salt_version) = source.get(keys::SALT_VERSION) {
            config = config.with_salt_version(salt_version);
        }

        Ok(config)
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Saves to a YAML file. Secrets are not written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Secrets.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Relayer private key or mnemonic. Without it, creation returns unsigned calls and claims,
    /// refunds and cancellations are unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relayer_key: Option<String>,
}

impl fmt::Debug for SecretsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsConfig")
            .field("relayer_key", &self.relayer_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn parse_opt<T>(source: &dyn ConfigSource, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    source
        .get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|err: T::Err| ConfigError::InvalidValue { key, reason: err.to_string() })
        })
        .transpose()
}

const fn default_expiry_window() -> Duration {
    Duration::from_secs(DEFAULT_EXPIRY_WINDOW_SECS)
}

fn default_salt_version() -> String {
    DEFAULT_SALT_VERSION.to_string()
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(value.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
