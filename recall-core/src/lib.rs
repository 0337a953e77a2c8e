//! # recall-core
//!
//! Foundation crate for the Recall evidence pipeline.
//! Defines identifiers, models, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod models;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::MonotonicClock;
pub use config::RecallConfig;
pub use errors::{RecallError, RecallResult};
pub use ids::{EdgeKey, EntityId, LogId};
pub use models::{Entity, EntityCandidate, LogLine, Relation, RelationCandidate};
