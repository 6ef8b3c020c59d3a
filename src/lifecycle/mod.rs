//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Cycle (cycle.rs):
//!     Raw documents → Parse → Resolve body size limit → Precheck → Config
//!
//! Context (context.rs):
//!     Cancellation token + optional deadline, checked at every suspension point
//!
//! Signals (signals.rs):
//!     SIGINT → Cancel the running cycle
//! ```
//!
//! # Design Decisions
//! - One context per cycle, never shared across cycles
//! - Cancellation surfaces as an error of the awaited call, not a partial result

pub mod context;
pub mod cycle;
pub mod signals;

pub use context::CycleContext;
pub use cycle::{CyclePreparer, CycleSources};
