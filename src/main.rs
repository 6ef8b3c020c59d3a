//! Offline resolution of cluster monitoring configuration.
//!
//! Runs a single cycle against local files and prints the validated
//! configuration as JSON.
//!
//! ```text
//!  cluster-monitoring.yaml ─┐
//!                           ├─▶ parse/default ─▶ body size limit ─▶ precheck ─▶ stdout
//!  user-workload.yaml ──────┘                          ▲
//!                                                 --pod-capacity
//! ```

use async_trait::async_trait;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use monitoring_config::config::BoxError;
use monitoring_config::lifecycle::signals::{cancel_on_ctrl_c, join_listener};
use monitoring_config::observability::{logging, metrics};
use monitoring_config::{CycleContext, CyclePreparer, CycleSources, DeprecationMetrics, PodCapacityReader};

#[derive(Parser, Debug)]
#[command(name = "monitoring-config")]
#[command(about = "Resolve and validate cluster monitoring configuration", long_about = None)]
struct Cli {
    /// Cluster monitoring (administrator) configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User-workload configuration file
    #[arg(short, long)]
    user_config: Option<PathBuf>,

    /// Reject unknown fields and unsupported values while parsing
    #[arg(long)]
    strict: bool,

    /// Schedulable pod capacity used to resolve `automatic` body size limits
    #[arg(long, default_value_t = 250)]
    pod_capacity: u64,

    /// Abort the cycle after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Capacity reader answering with a fixed value.
struct StaticPodCapacity(u64);

#[async_trait]
impl PodCapacityReader for StaticPodCapacity {
    async fn pod_capacity(&self, _ctx: &CycleContext) -> Result<u64, BoxError> {
        Ok(self.0)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.json_logs);

    if let Some(addr) = cli.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let sources = CycleSources::load(cli.config.as_deref(), cli.user_config.as_deref())?;
    let preparer = CyclePreparer::new(
        Arc::new(StaticPodCapacity(cli.pod_capacity)),
        DeprecationMetrics::new(),
        cli.strict,
    );

    let ctx = CycleContext::new().with_timeout(Duration::from_secs(cli.timeout_secs));
    let interrupt = cancel_on_ctrl_c(ctx.cancellation_token().clone());

    let result = preparer.prepare(&sources, &ctx).await;
    ctx.cancel();
    join_listener(interrupt).await;

    let config = match result {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration rejected");
            return Err(e.into());
        }
    };

    if preparer.metrics().total() > 0 {
        tracing::warn!(
            deprecated_fields = preparer.metrics().total(),
            "Configuration uses deprecated fields"
        );
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
