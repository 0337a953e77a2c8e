//! Immutable, versioned read views of the graph.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use recall_core::errors::{RecallError, RecallResult};
use recall_core::ids::EntityId;
use recall_core::models::{Entity, Relation};

use crate::graph::IndexedGraph;

/// A consistent view of the graph at one version.
///
/// Never mutated after publication; readers hold it behind an `Arc` for as
/// long as a cycle needs it.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    version: u64,
    taken_at: Option<DateTime<Utc>>,
    graph: IndexedGraph,
}

impl GraphSnapshot {
    pub(crate) fn new(version: u64, taken_at: Option<DateTime<Utc>>, graph: IndexedGraph) -> Self {
        Self {
            version,
            taken_at,
            graph,
        }
    }

    /// The empty graph at version 0.
    pub fn empty() -> Self {
        Self::new(0, None, IndexedGraph::new())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Event time of the mutation that produced this version.
    pub fn taken_at(&self) -> Option<DateTime<Utc>> {
        self.taken_at
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.graph.entity(id)
    }

    #[cfg(test)]
    pub(crate) fn graph(&self) -> &IndexedGraph {
        &self.graph
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.graph.contains(id)
    }

    /// All entities, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.entities()
    }

    /// All relations, in no particular order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.graph.relations()
    }

    /// Neighbors over relations in either direction, sorted by neighbor id.
    pub fn neighbors(&self, id: &EntityId) -> Vec<(&EntityId, &Relation)> {
        self.graph.incident(id)
    }

    pub fn degree(&self, id: &EntityId) -> usize {
        self.graph.degree(id)
    }

    /// Relations with both endpoints in `ids`, sorted by (src, dst, kind).
    pub fn relations_among(&self, ids: &BTreeSet<EntityId>) -> Vec<&Relation> {
        let mut out: Vec<&Relation> = self
            .graph
            .relations()
            .filter(|r| ids.contains(&r.src) && ids.contains(&r.dst))
            .collect();
        out.sort_by(|a, b| {
            (&a.src, &a.dst, &a.kind).cmp(&(&b.src, &b.dst, &b.kind))
        });
        out
    }

    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relation_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_consistent(&self) -> bool {
        self.graph.is_consistent()
    }
}

/// Cloneable handle that always yields the latest published snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    cell: Arc<RwLock<Arc<GraphSnapshot>>>,
}

impl SnapshotReader {
    pub(crate) fn new(cell: Arc<RwLock<Arc<GraphSnapshot>>>) -> Self {
        Self { cell }
    }

    /// Latest published snapshot.
    pub fn latest(&self) -> RecallResult<Arc<GraphSnapshot>> {
        let guard = self
            .cell
            .read()
            .map_err(|e| RecallError::Concurrency(format!("snapshot lock poisoned: {e}")))?;
        Ok(Arc::clone(&guard))
    }

    pub fn version(&self) -> RecallResult<u64> {
        Ok(self.latest()?.version())
    }
}
