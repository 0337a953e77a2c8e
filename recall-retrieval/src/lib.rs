//! # recall-retrieval
//!
//! Gathers evidence for a fired trigger along two independent paths over one
//! immutable graph snapshot:
//! - **semantic**: embed the seeds, nearest-neighbor search over indexed log
//!   lines ([`search::semantic`]),
//! - **structural**: bounded breadth-first traversal from the seeds
//!   ([`search::structural`]), plus the lines logged around the firing line
//!   ([`search::temporal`]),
//!
//! then merges both hit lists into one ranked evidence list
//! ([`ranking::Merger`]). A failing or slow path degrades the cycle to the
//! surviving path instead of failing it.

pub mod engine;
pub mod ranking;
pub mod search;

pub use engine::{DualPathRetriever, PathOutcome, PathStatus, RetrievalOutcome};
pub use ranking::Merger;
pub use search::{Anchor, PathHit, SemanticSearch, StructuralSearch, TemporalContext};
