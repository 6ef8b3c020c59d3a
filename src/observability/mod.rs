//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Config resolution produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (deprecated configuration counter)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (concurrent map increments)

pub mod logging;
pub mod metrics;
