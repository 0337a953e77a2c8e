//! Structural path: bounded traversal from the seeds over the snapshot.

use recall_core::config::RetrievalConfig;
use recall_core::ids::EntityId;
use recall_core::models::{EvidenceRef, QueryOrigin};
use recall_graph::traversal::{traverse, TraversalConfig};
use recall_graph::GraphSnapshot;

use super::PathHit;

#[derive(Debug, Clone)]
pub struct StructuralSearch {
    config: TraversalConfig,
}

impl StructuralSearch {
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(TraversalConfig::from(config))
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Every reached entity with its path score; text is the entity's latest
    /// mention.
    pub fn search(&self, snapshot: &GraphSnapshot, seeds: &[EntityId]) -> Vec<PathHit> {
        let result = traverse(snapshot, seeds, &self.config);
        if result.truncated || !result.hubs_skipped.is_empty() {
            tracing::debug!(
                truncated = result.truncated,
                hubs = result.hubs_skipped.len(),
                "structural path bounded"
            );
        }
        result
            .nodes
            .into_iter()
            .filter_map(|node| {
                let entity = snapshot.entity(&node.entity_id)?;
                let mention = entity.latest_mention();
                Some(PathHit {
                    reference: EvidenceRef::Entity(node.entity_id),
                    score: node.path_score,
                    last_seen: entity.last_seen,
                    text: mention.map(|m| m.text.clone()),
                    source_log: mention.map(|m| m.log_id),
                    origin: QueryOrigin::Traversal {
                        seed: node.seed,
                        depth: node.depth,
                    },
                })
            })
            .collect()
    }
}
