//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Count uses of deprecated configuration fields
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `cluster_monitoring_operator_deprecated_config_in_use` (counter):
//!   labelled by `configmap`, `field`, `deprecation_version`
//!
//! # Design Decisions
//! - The registry is injected into the precheck rather than reached through
//!   a global, so tests can read and reset it
//! - Every increment is also forwarded to the `metrics` facade, which the
//!   Prometheus exporter scrapes

use dashmap::DashMap;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::sync::Arc;

/// Name of the deprecated configuration counter.
pub const DEPRECATED_CONFIG_IN_USE: &str = "cluster_monitoring_operator_deprecated_config_in_use";

/// Identity of a deprecated configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeprecatedField {
    /// Namespace/name of the config map holding the field.
    pub configmap: &'static str,
    /// Dotted path of the field.
    pub field: &'static str,
    /// Release that deprecated the field.
    pub deprecation_version: &'static str,
}

/// Process-scoped counters for deprecated configuration usage.
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct DeprecationMetrics {
    counts: Arc<DashMap<DeprecatedField, u64>>,
}

impl DeprecationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one use of a deprecated field.
    pub fn record(&self, field: DeprecatedField) {
        *self.counts.entry(field).or_insert(0) += 1;

        metrics::counter!(
            DEPRECATED_CONFIG_IN_USE,
            "configmap" => field.configmap,
            "field" => field.field,
            "deprecation_version" => field.deprecation_version
        )
        .increment(1);
    }

    /// Current count for one field.
    pub fn count(&self, field: &DeprecatedField) -> u64 {
        self.counts.get(field).map(|c| *c.value()).unwrap_or(0)
    }

    /// Sum over all fields.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| *c.value()).sum()
    }

    /// Clear the local counters. Values already exported are unaffected.
    pub fn reset(&self) {
        self.counts.clear();
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!(
        DEPRECATED_CONFIG_IN_USE,
        "Counts uses of deprecated cluster monitoring configuration fields"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}
