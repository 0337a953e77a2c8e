//! Bounded breadth-first expansion from seed entities.
//!
//! Relations are followed in both directions. Seeds are expanded in
//! ascending id order and neighbors in ascending id order, so the result is
//! a pure function of the snapshot, the seeds, and the config.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use recall_core::config::RetrievalConfig;
use recall_core::constants::MAX_TRAVERSAL_DEPTH;
use recall_core::ids::{EdgeKey, EntityId};

use crate::snapshot::GraphSnapshot;

/// Traversal bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Maximum hops from any seed. Capped at `MAX_TRAVERSAL_DEPTH`.
    pub max_depth: usize,
    /// Maximum number of nodes reported, seeds included.
    pub max_nodes: usize,
    /// Score multiplier applied per hop.
    pub depth_decay: f64,
    /// Relations lighter than this are not followed.
    pub min_edge_weight: f64,
    /// Nodes with more incident relations than this are reported but not
    /// expanded.
    pub max_degree: usize,
}

impl From<&RetrievalConfig> for TraversalConfig {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
            depth_decay: config.depth_decay,
            min_edge_weight: config.min_edge_weight,
            max_degree: config.max_degree,
        }
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self::from(&RetrievalConfig::default())
    }
}

/// A node reached during traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalNode {
    pub entity_id: EntityId,
    /// Hops from the seed that reached it first.
    pub depth: usize,
    /// Product of traversed edge weights times `depth_decay^depth`.
    /// 1.0 for seeds.
    pub path_score: f64,
    pub seed: EntityId,
    /// Relation over which the best path arrived. `None` for seeds.
    pub via: Option<EdgeKey>,
}

/// Traversal output, sorted by (depth, entity id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalResult {
    pub nodes: Vec<TraversalNode>,
    pub max_depth_reached: usize,
    /// True when `max_nodes` cut the expansion short.
    pub truncated: bool,
    /// Hubs that were reported but not expanded.
    pub hubs_skipped: Vec<EntityId>,
}

/// Walk outward from `seeds`. Seeds missing from the snapshot are ignored.
pub fn traverse(snapshot: &GraphSnapshot, seeds: &[EntityId], config: &TraversalConfig) -> TraversalResult {
    let max_depth = config.max_depth.min(MAX_TRAVERSAL_DEPTH);
    let mut result = TraversalResult::default();
    let mut best: BTreeMap<EntityId, TraversalNode> = BTreeMap::new();
    let mut queue: VecDeque<EntityId> = VecDeque::new();

    let mut ordered: Vec<&EntityId> = seeds.iter().filter(|s| snapshot.contains(s)).collect();
    ordered.sort();
    ordered.dedup();

    for seed in ordered {
        if best.len() >= config.max_nodes {
            result.truncated = true;
            break;
        }
        best.insert(
            seed.clone(),
            TraversalNode {
                entity_id: seed.clone(),
                depth: 0,
                path_score: 1.0,
                seed: seed.clone(),
                via: None,
            },
        );
        queue.push_back(seed.clone());
    }

    while let Some(current) = queue.pop_front() {
        let Some(node) = best.get(&current).cloned() else {
            continue;
        };
        if node.depth >= max_depth {
            continue;
        }
        if snapshot.degree(&current) > config.max_degree {
            result.hubs_skipped.push(current);
            continue;
        }

        let next_depth = node.depth + 1;
        for (neighbor, relation) in snapshot.neighbors(&current) {
            if relation.weight < config.min_edge_weight {
                continue;
            }
            let score = node.path_score * relation.weight * config.depth_decay;
            match best.get_mut(neighbor) {
                Some(existing) => {
                    if existing.depth == next_depth && score > existing.path_score {
                        existing.path_score = score;
                        existing.seed = node.seed.clone();
                        existing.via = Some(relation.key());
                    }
                }
                None => {
                    if best.len() >= config.max_nodes {
                        result.truncated = true;
                        continue;
                    }
                    best.insert(
                        neighbor.clone(),
                        TraversalNode {
                            entity_id: neighbor.clone(),
                            depth: next_depth,
                            path_score: score,
                            seed: node.seed.clone(),
                            via: Some(relation.key()),
                        },
                    );
                    result.max_depth_reached = result.max_depth_reached.max(next_depth);
                    queue.push_back(neighbor.clone());
                }
            }
        }
    }

    let mut nodes: Vec<TraversalNode> = best.into_values().collect();
    nodes.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.entity_id.cmp(&b.entity_id)));
    result.hubs_skipped.sort();
    result.nodes = nodes;
    result
}
