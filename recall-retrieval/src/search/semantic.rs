//! Semantic path: one embedding of the seed text, top-K cosine lookup over
//! the snippet index, hits projected back onto live entities.

use std::collections::BTreeMap;
use std::sync::Arc;

use recall_core::errors::{EmbeddingError, RecallError, RecallResult};
use recall_core::ids::EntityId;
use recall_core::models::{EvidenceRef, QueryOrigin};
use recall_core::traits::IEmbeddingProvider;
use recall_embeddings::{SearchHit, SharedIndex};
use recall_graph::GraphSnapshot;

use super::PathHit;

/// Nearest-neighbor search over indexed log lines.
pub struct SemanticSearch {
    provider: Arc<dyn IEmbeddingProvider>,
    index: SharedIndex,
    top_k: usize,
}

impl SemanticSearch {
    pub fn new(provider: Arc<dyn IEmbeddingProvider>, index: SharedIndex, top_k: usize) -> Self {
        Self {
            provider,
            index,
            top_k,
        }
    }

    /// Run the path. Provider and index failures are returned as errors; the
    /// engine turns them into a degraded path.
    pub fn search(&self, snapshot: &GraphSnapshot, seeds: &[EntityId]) -> RecallResult<Vec<PathHit>> {
        let query = query_text(snapshot, seeds);
        if query.is_empty() || self.top_k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.provider.embed(&query)?;

        let hits = {
            let index = self
                .index
                .read()
                .map_err(|e| RecallError::Concurrency(format!("vector index lock poisoned: {e}")))?;
            if vector.len() != index.dimensions() {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: index.dimensions(),
                    actual: vector.len(),
                }
                .into());
            }
            index.search(&vector, self.top_k)?
        };

        Ok(project(snapshot, &hits))
    }
}

/// Seed values, then each seed's most recent mention (deduplicated), one per
/// line. Seeds missing from the snapshot contribute nothing.
pub fn query_text(snapshot: &GraphSnapshot, seeds: &[EntityId]) -> String {
    let live: Vec<_> = seeds.iter().filter_map(|id| snapshot.entity(id)).collect();
    if live.is_empty() {
        return String::new();
    }
    let mut lines = vec![live
        .iter()
        .map(|e| e.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")];
    for entity in &live {
        if let Some(mention) = entity.latest_mention() {
            if !lines.iter().any(|l| l == &mention.text) {
                lines.push(mention.text.clone());
            }
        }
    }
    lines.join("\n")
}

/// Map index hits to evidence. An entity gets the best hit that mentions it;
/// a hit mentioning no live entity is kept as a snippet.
fn project(snapshot: &GraphSnapshot, hits: &[SearchHit]) -> Vec<PathHit> {
    let mut by_entity: BTreeMap<&EntityId, (usize, &SearchHit)> = BTreeMap::new();
    let mut out = Vec::new();

    for (rank, hit) in hits.iter().enumerate() {
        let mut mapped = false;
        for id in hit.entities.iter().filter(|id| snapshot.contains(id)) {
            mapped = true;
            // Hits arrive best first, so the first hit per entity is its max.
            by_entity.entry(id).or_insert((rank, hit));
        }
        if !mapped {
            out.push(PathHit {
                reference: EvidenceRef::Snippet(hit.log_id),
                score: f64::from(hit.score),
                last_seen: hit.ts,
                text: Some(hit.text.clone()),
                source_log: Some(hit.log_id),
                origin: QueryOrigin::SemanticTopK { rank },
            });
        }
    }

    for (id, (rank, hit)) in by_entity {
        let Some(entity) = snapshot.entity(id) else {
            continue;
        };
        out.push(PathHit {
            reference: EvidenceRef::Entity(id.clone()),
            score: f64::from(hit.score),
            last_seen: entity.last_seen,
            text: Some(hit.text.clone()),
            source_log: Some(hit.log_id),
            origin: QueryOrigin::SemanticTopK { rank },
        });
    }
    out.sort_by(|a, b| a.reference.cmp(&b.reference));
    out
}
