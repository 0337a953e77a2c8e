//! # recall-graph
//!
//! The dynamic log-entity graph: a single-writer store of decaying entities
//! and relations that publishes immutable, versioned snapshots to readers.
//!
//! - [`GraphStore`] applies upsert batches and decay passes.
//! - [`GraphSnapshot`] is the read view used by the trigger and retriever.
//! - [`traversal`] walks a snapshot from seed entities with bounded depth.

pub mod formula;
pub mod graph;
pub mod snapshot;
pub mod store;
pub mod traversal;

pub use graph::IndexedGraph;
pub use snapshot::{GraphSnapshot, SnapshotReader};
pub use store::{DecayReport, GraphStore, RejectedItem, UpsertBatch, UpsertReport};
pub use traversal::{TraversalConfig, TraversalNode, TraversalResult};
