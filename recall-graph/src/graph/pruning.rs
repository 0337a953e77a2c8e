//! Remove decayed entities and weak relations.

use chrono::{DateTime, Utc};
use petgraph::stable_graph::EdgeIndex;

use recall_core::ids::EntityId;

use super::IndexedGraph;
use crate::formula::elapsed_secs;

/// Result of a pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneResult {
    /// Entities removed.
    pub entities_removed: Vec<EntityId>,
    /// Relations removed, including those dropped with a pruned endpoint.
    pub edges_removed: usize,
}

/// Remove every relation whose weight is below `floor`.
pub fn prune_weak_edges(graph: &mut IndexedGraph, floor: f64) -> usize {
    let weak: Vec<EdgeIndex> = graph
        .graph
        .edge_indices()
        .filter(|&idx| graph.graph.edge_weight(idx).is_some_and(|r| r.weight < floor))
        .collect();

    let count = weak.len();
    for idx in weak {
        graph.graph.remove_edge(idx);
    }
    count
}

/// Remove entities below `floor` that have not been seen for `grace_secs`.
/// Their incident relations go with them.
pub fn prune_inactive_entities(
    graph: &mut IndexedGraph,
    floor: f64,
    grace_secs: f64,
    now: DateTime<Utc>,
) -> PruneResult {
    let mut stale: Vec<EntityId> = graph
        .entities()
        .filter(|e| e.weight < floor && elapsed_secs(e.last_seen, now) >= grace_secs)
        .map(|e| e.id.clone())
        .collect();
    stale.sort();

    let mut edges_removed = 0;
    for id in &stale {
        edges_removed += graph.remove_entity(id).unwrap_or(0);
    }

    PruneResult {
        entities_removed: stale,
        edges_removed,
    }
}

/// Entity pass first, then the edge pass over what remains.
pub fn prune(graph: &mut IndexedGraph, floor: f64, grace_secs: f64, now: DateTime<Utc>) -> PruneResult {
    let mut result = prune_inactive_entities(graph, floor, grace_secs, now);
    result.edges_removed += prune_weak_edges(graph, floor);
    result
}
