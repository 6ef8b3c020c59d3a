//! Configuration schema definitions.
//!
//! This module defines the two configuration trees consumed by a
//! reconciliation cycle: the administrator-level cluster monitoring
//! configuration and the user-workload configuration. All types derive
//! Serde traits for deserialization from YAML (or JSON) documents.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::config::types::{BodySizeLimit, Toggle};

/// Deserialize a sub-tree, treating an explicit `null` as "use the defaults".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Root of the administrator-supplied configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterMonitoringConfiguration {
    /// Platform Prometheus Operator settings.
    #[serde(deserialize_with = "null_as_default")]
    pub prometheus_operator: PrometheusOperatorConfig,

    /// Platform Prometheus settings.
    #[serde(deserialize_with = "null_as_default")]
    pub prometheus_k8s: PrometheusK8sConfig,

    /// Platform Alertmanager settings.
    #[serde(deserialize_with = "null_as_default")]
    pub alertmanager_main: AlertmanagerMainConfig,

    /// Prometheus adapter settings (resource metrics API).
    #[serde(deserialize_with = "null_as_default")]
    pub k8s_prometheus_adapter: K8sPrometheusAdapter,

    /// Metrics server settings (replaces the adapter when enabled).
    #[serde(deserialize_with = "null_as_default")]
    pub metrics_server: MetricsServerConfig,

    /// Telemetry client settings.
    #[serde(deserialize_with = "null_as_default")]
    pub telemeter_client: TelemeterClientConfig,

    /// Outbound HTTP proxy settings.
    #[serde(deserialize_with = "null_as_default")]
    pub http: HttpConfig,

    /// Deploy the user-workload monitoring stack.
    #[serde(deserialize_with = "null_as_default")]
    pub enable_user_workload: bool,
}

impl ClusterMonitoringConfiguration {
    /// The Prometheus adapter serves the resource metrics API unless
    /// metrics-server was explicitly enabled in its place.
    pub fn prometheus_adapter_enabled(&self) -> bool {
        !self.metrics_server.enabled.resolve(false)
    }

    pub fn dedicated_service_monitors_enabled(&self) -> bool {
        self.k8s_prometheus_adapter.dedicated_service_monitors.enabled
    }
}

/// Kubernetes-style compute resource requirements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResourceRequirements {
    pub limits: BTreeMap<String, String>,
    pub requests: BTreeMap<String, String>,
}

/// Prometheus Operator settings (shared by both trees).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PrometheusOperatorConfig {
    /// Log level of the operator (`debug`, `info`, `warn`, `error`).
    pub log_level: String,

    /// Node selector for the operator pod.
    pub node_selector: BTreeMap<String, String>,

    pub resources: Option<ResourceRequirements>,
}

/// Platform Prometheus settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PrometheusK8sConfig {
    /// Upper bound on accepted scrape-response body size.
    pub enforced_body_size_limit: BodySizeLimit,

    /// Requested collection profile. Empty selects `full`; the closed set is
    /// enforced by the precheck (or at parse time when strict).
    pub collection_profile: String,

    /// Data retention (e.g. `15d`).
    pub retention: String,

    /// Maximum bytes of storage used by blocks (e.g. `10GB`).
    pub retention_size: String,

    pub log_level: String,

    /// Labels added to every series and alert.
    pub external_labels: BTreeMap<String, String>,

    pub node_selector: BTreeMap<String, String>,

    pub resources: Option<ResourceRequirements>,

    /// Persistent volume claim template, passed through unmodified.
    pub volume_claim_template: Option<serde_yaml::Value>,
}

/// Platform Alertmanager settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertmanagerMainConfig {
    /// Deploy the platform Alertmanager (enabled unless set to false).
    pub enabled: Toggle,

    /// Let user-workload AlertmanagerConfig resources reach this Alertmanager.
    #[serde(deserialize_with = "null_as_default")]
    pub enable_user_alertmanager_config: bool,

    pub log_level: String,

    pub resources: Option<ResourceRequirements>,

    /// Persistent volume claim template, passed through unmodified.
    pub volume_claim_template: Option<serde_yaml::Value>,
}

impl AlertmanagerMainConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.resolve(true)
    }
}

/// Prometheus adapter settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct K8sPrometheusAdapter {
    /// Audit logging of the adapter API server.
    #[serde(deserialize_with = "null_as_default")]
    pub audit: AuditConfig,

    /// Deprecated: the adapter is being replaced by metrics-server.
    pub resources: Option<ResourceRequirements>,

    /// Use dedicated ServiceMonitors for resource metrics.
    #[serde(deserialize_with = "null_as_default")]
    pub dedicated_service_monitors: DedicatedServiceMonitors,

    pub node_selector: BTreeMap<String, String>,
}

/// Audit policy selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Audit profile name (`None`, `Metadata`, `Request`, `RequestResponse`).
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DedicatedServiceMonitors {
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
}

/// Metrics server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MetricsServerConfig {
    /// Deploy metrics-server instead of the Prometheus adapter.
    pub enabled: Toggle,
}

/// Telemetry client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TelemeterClientConfig {
    /// Cluster identity reported with telemetry.
    #[serde(rename = "clusterID")]
    pub cluster_id: String,

    /// Pull-secret token used to authenticate telemetry uploads.
    pub token: String,

    /// Explicit opt-in/opt-out. Unset means "not overridden".
    pub enabled: Toggle,
}

/// Outbound HTTP proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    pub http_proxy: String,
    pub https_proxy: String,
    pub no_proxy: String,
}

impl HttpConfig {
    /// Returns true if no proxy field was configured.
    pub fn is_empty(&self) -> bool {
        self.http_proxy.is_empty() && self.https_proxy.is_empty() && self.no_proxy.is_empty()
    }
}

/// Root of the user-workload configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UserWorkloadConfiguration {
    /// User-workload Prometheus Operator settings.
    #[serde(deserialize_with = "null_as_default")]
    pub prometheus_operator: PrometheusOperatorConfig,

    /// User-workload Prometheus settings.
    #[serde(deserialize_with = "null_as_default")]
    pub prometheus: UserWorkloadPrometheusConfig,

    /// Thanos Ruler settings.
    #[serde(deserialize_with = "null_as_default")]
    pub thanos_ruler: ThanosRulerConfig,
}

/// User-workload Prometheus settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UserWorkloadPrometheusConfig {
    /// Default scrape interval for user ServiceMonitors (e.g. `30s`).
    pub scrape_interval: Option<String>,

    /// Per-scrape sample limit enforced on user targets.
    pub enforced_sample_limit: Option<u64>,

    pub retention: String,

    pub retention_size: String,

    pub log_level: String,

    pub external_labels: BTreeMap<String, String>,

    pub resources: Option<ResourceRequirements>,
}

/// Thanos Ruler settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ThanosRulerConfig {
    pub retention: String,

    pub log_level: String,

    pub resources: Option<ResourceRequirements>,
}
