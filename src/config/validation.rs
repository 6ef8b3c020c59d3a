//! Configuration precheck.
//!
//! # Responsibilities
//! - Bound the user-workload scrape interval
//! - Restrict the collection profile to the supported set
//! - Count uses of deprecated fields
//!
//! # Design Decisions
//! - Runs after both documents are merged and the body size limit resolved
//! - Every rule runs on every call; the first failing rule's error is returned
//! - Deprecated fields never fail validation, they only increment a counter
//! - Never mutates the configuration

use std::time::Duration;

use crate::config::loader::{Config, ConfigError, Result};
use crate::config::schema::{PrometheusK8sConfig, UserWorkloadPrometheusConfig};
use crate::config::types::CollectionProfile;
use crate::config::units;
use crate::observability::metrics::{DeprecatedField, DeprecationMetrics};

/// Shortest accepted user-workload scrape interval.
pub const SCRAPE_INTERVAL_LOWER_BOUND: Duration = Duration::from_secs(5);

/// Longest accepted user-workload scrape interval.
pub const SCRAPE_INTERVAL_UPPER_BOUND: Duration = Duration::from_secs(5 * 60);

/// Scrape interval used when none is configured.
pub const DEFAULT_SCRAPE_INTERVAL: Duration = Duration::from_secs(30);

const CLUSTER_MONITORING_CONFIGMAP: &str = "openshift-monitoring/cluster-monitoring-config";

/// `k8sPrometheusAdapter.resources`, superseded by metrics-server.
pub const DEPRECATED_ADAPTER_RESOURCES: DeprecatedField = DeprecatedField {
    configmap: CLUSTER_MONITORING_CONFIGMAP,
    field: "k8sPrometheusAdapter.resources",
    deprecation_version: "4.16",
};

impl UserWorkloadPrometheusConfig {
    /// Configured scrape interval, or the default when unset.
    pub fn effective_scrape_interval(&self) -> Result<Duration> {
        let Some(raw) = self.scrape_interval.as_deref() else {
            return Ok(DEFAULT_SCRAPE_INTERVAL);
        };

        let interval = units::parse_duration(raw)
            .map_err(|e| ConfigError::invalid_value("prometheus.scrapeInterval", e))?;

        if !(SCRAPE_INTERVAL_LOWER_BOUND..=SCRAPE_INTERVAL_UPPER_BOUND).contains(&interval) {
            return Err(ConfigError::invalid_value(
                "prometheus.scrapeInterval",
                format!(
                    "{raw} is outside the allowed range [{}, {}]",
                    humantime::format_duration(SCRAPE_INTERVAL_LOWER_BOUND),
                    humantime::format_duration(SCRAPE_INTERVAL_UPPER_BOUND),
                ),
            ));
        }
        Ok(interval)
    }
}

impl PrometheusK8sConfig {
    /// Requested collection profile, with an empty value meaning `full`.
    pub fn effective_collection_profile(&self) -> Result<CollectionProfile> {
        self.collection_profile
            .parse()
            .map_err(|e| ConfigError::invalid_value("prometheusK8s.collectionProfile", e))
    }
}

impl Config {
    /// Validate the merged configuration before any reconciliation runs.
    pub fn precheck(&self, metrics: &DeprecationMetrics) -> Result<()> {
        let scrape_interval = self
            .user_workload_configuration
            .prometheus
            .effective_scrape_interval();
        let collection_profile = self
            .cluster_monitoring_configuration
            .prometheus_k8s
            .effective_collection_profile();
        self.record_deprecated_fields(metrics);

        let scrape_interval = scrape_interval?;
        let collection_profile = collection_profile?;

        tracing::debug!(
            scrape_interval = %humantime::format_duration(scrape_interval),
            collection_profile = %collection_profile,
            "Configuration precheck passed"
        );
        Ok(())
    }

    fn record_deprecated_fields(&self, metrics: &DeprecationMetrics) {
        let adapter = &self.cluster_monitoring_configuration.k8s_prometheus_adapter;
        if adapter.resources.is_some() {
            tracing::warn!(
                field = DEPRECATED_ADAPTER_RESOURCES.field,
                deprecation_version = DEPRECATED_ADAPTER_RESOURCES.deprecation_version,
                "Deprecated configuration field in use"
            );
            metrics.record(DEPRECATED_ADAPTER_RESOURCES);
        }
    }
}
