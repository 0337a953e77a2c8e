//! petgraph::StableGraph wrapper keyed by [`EntityId`].
//!
//! Node and edge payloads are `Arc`-shared. Cloning the graph for a snapshot
//! copies pointers; a payload is copied only when a later mutation touches
//! it (`Arc::make_mut`).

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use recall_core::ids::{EdgeKey, EntityId};
use recall_core::models::{Entity, Relation};

/// The underlying directed multigraph. Parallel edges differ by `kind`.
pub type EntityGraph = StableGraph<Arc<Entity>, Arc<Relation>, Directed>;

/// Entity graph with O(1) id lookup.
#[derive(Debug, Clone)]
pub struct IndexedGraph {
    pub graph: EntityGraph,
    /// Map from entity id to its node. Copied on write like the payloads.
    node_index: Arc<HashMap<EntityId, NodeIndex>>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: Arc::new(HashMap::new()),
        }
    }

    pub fn get_node(&self, id: &EntityId) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.get_node(id).and_then(|idx| self.graph.node_weight(idx)).map(Arc::as_ref)
    }

    /// The shared payload, for callers that want to keep it past the graph.
    pub fn shared_entity(&self, id: &EntityId) -> Option<&Arc<Entity>> {
        self.get_node(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Mutable access; unshares the payload if a snapshot still holds it.
    pub fn entity_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        let idx = self.get_node(id)?;
        self.graph.node_weight_mut(idx).map(Arc::make_mut)
    }

    /// Apply `f` to every entity.
    pub fn update_entities(&mut self, mut f: impl FnMut(&mut Entity)) {
        for idx in self.graph.node_indices().collect::<Vec<_>>() {
            if let Some(slot) = self.graph.node_weight_mut(idx) {
                f(Arc::make_mut(slot));
            }
        }
    }

    /// Apply `f` to every relation.
    pub fn update_relations(&mut self, mut f: impl FnMut(&mut Relation)) {
        for idx in self.graph.edge_indices().collect::<Vec<_>>() {
            if let Some(slot) = self.graph.edge_weight_mut(idx) {
                f(Arc::make_mut(slot));
            }
        }
    }

    /// Insert a new entity. An existing entity with the same id is replaced.
    pub fn insert_entity(&mut self, entity: Entity) -> NodeIndex {
        if let Some(idx) = self.get_node(&entity.id) {
            if let Some(slot) = self.graph.node_weight_mut(idx) {
                *slot = Arc::new(entity);
            }
            return idx;
        }
        let id = entity.id.clone();
        let idx = self.graph.add_node(Arc::new(entity));
        Arc::make_mut(&mut self.node_index).insert(id, idx);
        idx
    }

    /// Remove an entity and every incident edge. Returns the number of edges
    /// removed along with it, or `None` if the entity was absent.
    pub fn remove_entity(&mut self, id: &EntityId) -> Option<usize> {
        let idx = Arc::make_mut(&mut self.node_index).remove(id)?;
        let incident = self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .filter(|e| e.source() != idx)
                .count();
        self.graph.remove_node(idx);
        Some(incident)
    }

    pub fn find_edge(&self, key: &EdgeKey) -> Option<EdgeIndex> {
        let src = self.get_node(&key.src)?;
        let dst = self.get_node(&key.dst)?;
        self.graph
            .edges_directed(src, Direction::Outgoing)
            .find(|e| e.target() == dst && e.weight().kind == key.kind)
            .map(|e| e.id())
    }

    pub fn relation(&self, key: &EdgeKey) -> Option<&Relation> {
        self.find_edge(key).and_then(|idx| self.graph.edge_weight(idx)).map(Arc::as_ref)
    }

    pub fn relation_mut(&mut self, key: &EdgeKey) -> Option<&mut Relation> {
        let idx = self.find_edge(key)?;
        self.graph.edge_weight_mut(idx).map(Arc::make_mut)
    }

    /// Add a relation whose endpoints are both present. Returns `None` when
    /// either endpoint is missing.
    pub fn insert_relation(&mut self, relation: Relation) -> Option<EdgeIndex> {
        let src = self.get_node(&relation.src)?;
        let dst = self.get_node(&relation.dst)?;
        Some(self.graph.add_edge(src, dst, Arc::new(relation)))
    }

    /// Relations touching `id` in either direction, with the entity on the
    /// other end. Sorted by (neighbor id, kind, direction).
    pub fn incident(&self, id: &EntityId) -> Vec<(&EntityId, &Relation)> {
        let Some(idx) = self.get_node(id) else {
            return Vec::new();
        };
        let mut out: Vec<(&EntityId, &Relation)> = Vec::new();
        for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
            if let Some(other) = self.graph.node_weight(edge.target()) {
                out.push((&other.id, edge.weight().as_ref()));
            }
        }
        for edge in self.graph.edges_directed(idx, Direction::Incoming) {
            if let Some(other) = self.graph.node_weight(edge.source()) {
                out.push((&other.id, edge.weight().as_ref()));
            }
        }
        out.sort_by(|a, b| {
            a.0.cmp(b.0)
                .then_with(|| a.1.kind.cmp(&b.1.kind))
                .then_with(|| a.1.src.cmp(&b.1.src))
        });
        out
    }

    /// Number of relations incident to `id`, both directions.
    pub fn degree(&self, id: &EntityId) -> usize {
        self.get_node(id).map_or(0, |idx| {
            self.graph.edges_directed(idx, Direction::Outgoing).count()
                + self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_weights().map(Arc::as_ref)
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.graph.edge_weights().map(Arc::as_ref)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Verify the id index agrees with the graph and that every relation's
    /// endpoints resolve to the nodes it is attached to.
    pub fn is_consistent(&self) -> bool {
        if self.node_index.len() != self.graph.node_count() {
            return false;
        }
        let index_ok = self.node_index.iter().all(|(id, &idx)| {
            self.graph.node_weight(idx).is_some_and(|e| &e.id == id)
        });
        let edges_ok = self.graph.edge_indices().all(|e| {
            let Some((a, b)) = self.graph.edge_endpoints(e) else {
                return false;
            };
            let Some(rel) = self.graph.edge_weight(e) else {
                return false;
            };
            self.get_node(&rel.src) == Some(a) && self.get_node(&rel.dst) == Some(b)
        });
        index_ok && edges_ok
    }
}

impl Default for IndexedGraph {
    fn default() -> Self {
        Self::new()
    }
}
