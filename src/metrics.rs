//! Driver metrics.

use metrics::Counter;
use metrics_derive::Metrics;

/// Metrics of an escrow driver, labelled by scheme.
#[derive(Metrics, Clone)]
#[metrics(scope = "escrow")]
pub struct DriverMetrics {
    /// Number of transfers created or locked, submitted or handed back unsigned.
    pub created: Counter,
    /// Number of submitted claims.
    pub claimed: Counter,
    /// Number of submitted refunds.
    pub refunded: Counter,
    /// Number of submitted cancellations.
    pub cancelled: Counter,
    /// Number of calls the contract rejected.
    pub rejected: Counter,
    /// Number of calls that failed in transport.
    pub transport_failures: Counter,
}

impl DriverMetrics {
    /// Creates metrics labelled with the escrow scheme.
    pub fn for_scheme(scheme: &'static str) -> Self {
        Self::new_with_labels(&[("scheme", scheme)])
    }
}
