//! Preparation of the configuration for one reconciliation cycle.
//!
//! # Responsibilities
//! - Parse and default both documents
//! - Resolve values that depend on live cluster state
//! - Run the precheck before anything is reconciled
//!
//! # Design Decisions
//! - Fail fast: any error aborts the cycle, the next cycle starts over
//! - No retries here; the caller owns the cycle schedule

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, ConfigError, PodCapacityReader, Result};
use crate::lifecycle::context::CycleContext;
use crate::observability::metrics::DeprecationMetrics;

/// Raw configuration documents supplied to a cycle. Either may be empty.
#[derive(Debug, Clone, Default)]
pub struct CycleSources {
    pub cluster_monitoring: String,
    pub user_workload: String,
}

impl CycleSources {
    /// Read the documents from disk. A `None` path means the source was not
    /// supplied.
    pub fn load(cluster_monitoring: Option<&Path>, user_workload: Option<&Path>) -> Result<Self> {
        Ok(Self {
            cluster_monitoring: cluster_monitoring.map(read_source).transpose()?.unwrap_or_default(),
            user_workload: user_workload.map(read_source).transpose()?.unwrap_or_default(),
        })
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Long-lived collaborators shared by every cycle of the process.
#[derive(Clone)]
pub struct CyclePreparer {
    pod_capacity: Arc<dyn PodCapacityReader>,
    metrics: DeprecationMetrics,
    strict: bool,
}

impl CyclePreparer {
    pub fn new(pod_capacity: Arc<dyn PodCapacityReader>, metrics: DeprecationMetrics, strict: bool) -> Self {
        Self {
            pod_capacity,
            metrics,
            strict,
        }
    }

    pub fn metrics(&self) -> &DeprecationMetrics {
        &self.metrics
    }

    /// Build a validated configuration from the cycle's documents.
    pub async fn prepare(&self, sources: &CycleSources, ctx: &CycleContext) -> Result<Config> {
        let mut config = Config::parse_with_user_workload(
            &sources.cluster_monitoring,
            &sources.user_workload,
            self.strict,
        )?;

        config
            .load_enforced_body_size_limit(self.pod_capacity.as_ref(), ctx)
            .await?;
        config.precheck(&self.metrics)?;

        let cmo = &config.cluster_monitoring_configuration;
        tracing::info!(
            enforced_body_size_limit = %cmo.prometheus_k8s.enforced_body_size_limit,
            telemeter_enabled = cmo.telemeter_client.is_enabled(),
            prometheus_adapter_enabled = cmo.prometheus_adapter_enabled(),
            user_workload_enabled = cmo.enable_user_workload,
            "Configuration ready for reconciliation"
        );
        Ok(config)
    }
}

impl std::fmt::Debug for CyclePreparer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CyclePreparer")
            .field("metrics", &self.metrics)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
