//! # recall-trigger
//!
//! Decides when the pipeline runs a retrieval cycle.
//!
//! The [`TriggerEvaluator`] is driven by one [`Observation`] per graph
//! version: it accumulates novelty from touched high-weight entities, fires
//! on a novelty threshold, a maximum-wait timeout, or an urgent line signal,
//! and then enforces a cooldown. All timing comes from the observations, so
//! the same sequence of versions and timestamps always yields the same
//! fires.

pub mod burst;
pub mod delta;
pub mod evaluator;
pub mod signals;
pub mod state;

pub use burst::TemplateBurstDetector;
pub use delta::GraphDelta;
pub use evaluator::{FireEvent, Observation, TriggerEvaluator};
pub use signals::{severity_level, SignalDetector, UrgentSignal};
pub use state::{FireReason, Phase, TriggerState};
