//! GraphPack: the snapshot restricted to the entities named by the evidence.

use std::collections::BTreeSet;

use recall_core::ids::EntityId;
use recall_core::models::{EvidenceItem, GraphEdge, GraphNode, GraphPack};
use recall_graph::GraphSnapshot;

/// Nodes sorted by id, edges by `(src, dst, kind)`: only relations with
/// both endpoints among the evidence entities. Entities absent from the
/// snapshot are left out.
pub fn pack_graph(snapshot: &GraphSnapshot, evidence: &[EvidenceItem]) -> GraphPack {
    let ids: BTreeSet<EntityId> = evidence
        .iter()
        .filter_map(EvidenceItem::entity_id)
        .filter(|id| snapshot.contains(id))
        .cloned()
        .collect();

    let nodes = ids
        .iter()
        .filter_map(|id| snapshot.entity(id))
        .map(|e| GraphNode {
            id: e.id.clone(),
            etype: e.etype.clone(),
            value: e.value.clone(),
            weight: e.weight,
        })
        .collect();

    let edges = snapshot
        .relations_among(&ids)
        .into_iter()
        .map(|r| GraphEdge {
            src: r.src.clone(),
            dst: r.dst.clone(),
            kind: r.kind.clone(),
            weight: r.weight,
        })
        .collect();

    GraphPack {
        version: snapshot.version(),
        nodes,
        edges,
    }
}
