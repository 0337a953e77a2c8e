//! # recall-observability
//!
//! Structured tracing setup and event helpers, lock-free pipeline counters,
//! and degradation tracking for the retrieval paths.

pub mod counters;
pub mod degradation;
pub mod tracing_setup;

pub use counters::{CountersSnapshot, PipelineCounters};
pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::events;
