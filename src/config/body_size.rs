//! Resolution of the `automatic` enforced body size limit.
//!
//! # Responsibilities
//! - Leave unset, disabled and literal limits untouched
//! - Replace `automatic` with a size derived from the cluster's pod capacity
//!
//! # Design Decisions
//! - The capacity query is the only suspension point of a cycle; it is raced
//!   against the cycle's cancellation token and deadline
//! - Failures abort the cycle; the caller retries on the next one

use async_trait::async_trait;

use crate::config::loader::{BoxError, Config, ConfigError, Result};
use crate::config::types::BodySizeLimit;
use crate::config::units::MIB;
use crate::lifecycle::context::CycleContext;

/// Minimum limit produced by automatic resolution (48MB).
pub const MINIMAL_BODY_SIZE_LIMIT: u64 = 3 * 16 * MIB;

/// Expected samples exposed by each pod.
const SAMPLES_PER_POD: u64 = 400;

/// Expected encoded size of one sample in bytes.
const BYTES_PER_SAMPLE: u64 = 200;

/// Reports how many pods the cluster can currently schedule.
#[async_trait]
pub trait PodCapacityReader: Send + Sync {
    async fn pod_capacity(&self, ctx: &CycleContext) -> std::result::Result<u64, BoxError>;
}

/// Compute the limit for a given pod capacity.
///
/// Grows linearly with capacity and never drops below
/// [`MINIMAL_BODY_SIZE_LIMIT`].
pub fn automatic_body_size_limit(pod_capacity: u64) -> BodySizeLimit {
    let bytes = pod_capacity
        .saturating_mul(SAMPLES_PER_POD)
        .saturating_mul(BYTES_PER_SAMPLE)
        .max(MINIMAL_BODY_SIZE_LIMIT);
    BodySizeLimit::from_bytes_mib_ceil(bytes)
}

impl Config {
    /// Resolve `prometheusK8s.enforcedBodySizeLimit` in place.
    ///
    /// Only the `automatic` sentinel triggers a capacity query; on failure the
    /// field keeps its sentinel value.
    pub async fn load_enforced_body_size_limit(
        &mut self,
        reader: &dyn PodCapacityReader,
        ctx: &CycleContext,
    ) -> Result<()> {
        let limit = &mut self.cluster_monitoring_configuration.prometheus_k8s.enforced_body_size_limit;
        if !limit.is_automatic() {
            tracing::debug!(enforced_body_size_limit = %limit, "Enforced body size limit needs no resolution");
            return Ok(());
        }

        let pod_capacity = ctx.run(reader.pod_capacity(ctx)).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read pod capacity");
            ConfigError::external("failed to resolve automatic enforcedBodySizeLimit", e)
        })?;

        *limit = automatic_body_size_limit(pod_capacity);
        tracing::info!(
            pod_capacity,
            enforced_body_size_limit = %limit,
            "Resolved automatic enforced body size limit"
        );
        Ok(())
    }
}
