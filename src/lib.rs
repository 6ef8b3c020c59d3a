//! Cluster monitoring configuration resolution.
//!
//! Builds the configuration that drives one reconciliation cycle of a
//! monitoring stack: parses and defaults the administrator and user-workload
//! documents, resolves values that depend on live cluster state, and runs the
//! precheck before anything is reconciled.

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{Config, ConfigError, PodCapacityReader};
pub use lifecycle::{CycleContext, CyclePreparer, CycleSources};
pub use observability::metrics::DeprecationMetrics;
