use thiserror::Error;

/// Errors related to driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The network identifier is not one of the supported networks.
    #[error("unknown network {0:?}")]
    UnknownNetwork(String),
    /// A required value is absent.
    #[error("missing configuration: {0}")]
    MissingConfiguration(&'static str),
    /// A value is present but cannot be parsed.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// The configuration key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
