//! # recall-pipeline
//!
//! Wires the workspace together for one log stream. [`RecallPipeline`] owns
//! the single graph writer and the trigger evaluator, and runs a retrieval
//! cycle whenever the trigger fires.

pub mod cycle;
pub mod pipeline;
mod writer;

pub use cycle::{build_query, CycleOutput};
pub use pipeline::RecallPipeline;
