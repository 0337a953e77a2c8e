//! petgraph-backed storage for entities and relations.

mod indexed;
pub mod pruning;

pub use indexed::{EntityGraph, IndexedGraph};
