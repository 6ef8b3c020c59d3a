//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! admin document + user-workload document (YAML/JSON)
//!     → loader.rs (parse, default, optional strict checks)
//!     → body_size.rs (resolve `automatic` from pod capacity)
//!     → validation.rs (precheck, deprecation counter)
//!     → Config (validated, handed to reconciliation)
//! ```
//!
//! # Design Decisions
//! - A Config is rebuilt for every reconciliation cycle and owned by it
//! - All fields have defaults to allow minimal or empty documents
//! - Grammar-level rejection happens at parse time; range and enum checks
//!   run in the precheck

pub mod body_size;
pub mod loader;
pub mod proxy;
pub mod schema;
pub mod telemeter;
pub mod types;
pub mod units;
pub mod validation;

pub use body_size::PodCapacityReader;
pub use loader::{BoxError, CollaboratorError, Config, ConfigError, ConfigOrigin, Result};
pub use schema::{
    ClusterMonitoringConfiguration, HttpConfig, TelemeterClientConfig, UserWorkloadConfiguration,
};
pub use types::{BodySizeLimit, CollectionProfile, Toggle};
