//! Single-writer graph store: upsert batches, decay passes, snapshot
//! publication.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::config::GraphConfig;
use recall_core::errors::{GraphError, RecallError, RecallResult};
use recall_core::ids::{EdgeKey, EntityId};
use recall_core::models::{Entity, EntityCandidate, Extraction, LogLine, Mention, Relation, RelationCandidate};
use recall_observability::events;

use crate::formula::{clamp_unit, decayed, reinforce};
use crate::graph::{pruning, IndexedGraph};
use crate::snapshot::{GraphSnapshot, SnapshotReader};

/// One unit of mutation: the candidates extracted from a single line.
#[derive(Debug, Clone)]
pub struct UpsertBatch {
    pub entities: Vec<EntityCandidate>,
    pub relations: Vec<RelationCandidate>,
    /// Line the candidates were sighted in, recorded as a mention.
    pub source: Option<Mention>,
    /// Event time of the sighting.
    pub at: DateTime<Utc>,
}

impl UpsertBatch {
    pub fn new(entities: Vec<EntityCandidate>, relations: Vec<RelationCandidate>, at: DateTime<Utc>) -> Self {
        Self {
            entities,
            relations,
            source: None,
            at,
        }
    }

    /// Batch for one log line, stamped with `at` (the clock-adjusted time).
    pub fn from_line(line: &LogLine, extraction: Extraction, at: DateTime<Utc>) -> Self {
        Self {
            entities: extraction.entities,
            relations: extraction.relations,
            source: Some(Mention {
                log_id: line.id,
                ts: at,
                text: line.text.clone(),
            }),
            at,
        }
    }
}

/// Which half of a batch a rejected item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Entity,
    Relation,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Relation => "relation",
        }
    }
}

/// A candidate the store refused, with its position in the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    pub kind: ItemKind,
    pub index: usize,
    pub error: GraphError,
}

/// Outcome of one upsert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertReport {
    /// Version published by this upsert.
    pub version: u64,
    /// Entities first seen in this batch, sorted.
    pub created: Vec<EntityId>,
    /// Previously known entities refreshed by this batch, sorted.
    pub updated: Vec<EntityId>,
    pub edges_created: usize,
    pub edges_updated: usize,
    /// Malformed candidates.
    pub rejected: Vec<RejectedItem>,
    /// Relations dropped because an endpoint does not exist.
    pub integrity_violations: Vec<GraphError>,
}

impl UpsertReport {
    /// Every entity this batch created or refreshed, sorted.
    pub fn touched(&self) -> Vec<EntityId> {
        let mut all: Vec<EntityId> = self.created.iter().chain(&self.updated).cloned().collect();
        all.sort();
        all
    }
}

/// Outcome of one decay pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecayReport {
    pub version: u64,
    pub entities_pruned: Vec<EntityId>,
    pub edges_pruned: usize,
}

/// The graph store. Owned by exactly one writer; readers go through
/// [`SnapshotReader`] and only ever see whole published versions.
#[derive(Debug)]
pub struct GraphStore {
    config: GraphConfig,
    graph: IndexedGraph,
    version: u64,
    current: Arc<GraphSnapshot>,
    published: Arc<RwLock<Arc<GraphSnapshot>>>,
}

impl GraphStore {
    pub fn new(config: GraphConfig) -> Self {
        let current = Arc::new(GraphSnapshot::empty());
        Self {
            config,
            graph: IndexedGraph::new(),
            version: 0,
            published: Arc::new(RwLock::new(Arc::clone(&current))),
            current,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The snapshot published by the most recent mutation.
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&self.current)
    }

    /// A handle readers can hold across threads.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(Arc::clone(&self.published))
    }

    /// Apply a batch atomically and publish the next version.
    ///
    /// Malformed candidates and relations with a missing endpoint are
    /// reported and skipped; the rest of the batch still applies. The
    /// version advances exactly once per call.
    pub fn upsert(&mut self, batch: UpsertBatch) -> RecallResult<UpsertReport> {
        let mut report = UpsertReport::default();
        let now = batch.at;

        // Coalesce duplicate sightings within the batch: one occurrence, max confidence.
        let mut sightings: BTreeMap<EntityId, (&EntityCandidate, f64)> = BTreeMap::new();
        for (index, candidate) in batch.entities.iter().enumerate() {
            match validate_entity(candidate) {
                Ok(id) => {
                    let slot = sightings.entry(id).or_insert((candidate, candidate.confidence));
                    slot.1 = slot.1.max(candidate.confidence);
                }
                Err(error) => report.rejected.push(RejectedItem {
                    kind: ItemKind::Entity,
                    index,
                    error,
                }),
            }
        }

        for (id, (candidate, confidence)) in sightings {
            if self.graph.contains(&id) {
                self.refresh_entity(&id, confidence, batch.source.as_ref(), now);
                report.updated.push(id);
            } else {
                let entity = self.new_entity(id.clone(), candidate, confidence, batch.source.as_ref(), now);
                self.graph.insert_entity(entity);
                report.created.push(id);
            }
        }

        let mut seen_edges: BTreeSet<EdgeKey> = BTreeSet::new();
        for (index, candidate) in batch.relations.iter().enumerate() {
            let key = match validate_relation(candidate) {
                Ok(key) => key,
                Err(error) => {
                    report.rejected.push(RejectedItem {
                        kind: ItemKind::Relation,
                        index,
                        error,
                    });
                    continue;
                }
            };
            if let Some(missing) = [&key.src, &key.dst].into_iter().find(|id| !self.graph.contains(id)) {
                let violation = GraphError::DanglingEdge {
                    src: key.src.to_string(),
                    dst: key.dst.to_string(),
                    missing: missing.to_string(),
                };
                events::integrity_violation(key.src.as_str(), key.dst.as_str(), missing.as_str());
                report.integrity_violations.push(violation);
                continue;
            }
            if !seen_edges.insert(key.clone()) {
                continue;
            }
            let half_life = self.config.half_life_secs as f64;
            let gain = self.config.reinforcement * candidate.confidence;
            if let Some(rel) = self.graph.relation_mut(&key) {
                rel.weight = reinforce(decayed(rel.weight, rel.weight_as_of, now, half_life), gain);
                rel.weight_as_of = rel.weight_as_of.max(now);
                rel.last_updated = rel.last_updated.max(now);
                report.edges_updated += 1;
            } else {
                let relation = Relation {
                    src: key.src,
                    dst: key.dst,
                    kind: key.kind,
                    weight: clamp_unit(candidate.confidence),
                    last_updated: now,
                    weight_as_of: now,
                };
                if self.graph.insert_relation(relation).is_some() {
                    report.edges_created += 1;
                }
            }
        }

        report.version = self.publish(now)?;
        for rejected in &report.rejected {
            events::item_rejected(rejected.kind.as_str(), rejected.index, &rejected.error.to_string());
        }
        events::batch_upserted(
            report.version,
            report.created.len(),
            report.updated.len(),
            report.rejected.len(),
        );
        Ok(report)
    }

    /// Decay every weight to `now`, prune what fell below the floor, and
    /// publish the next version. Deterministic for a given prior state and
    /// `now`.
    pub fn decay(&mut self, now: DateTime<Utc>) -> RecallResult<DecayReport> {
        let half_life = self.config.half_life_secs as f64;

        self.graph.update_entities(|entity| {
            entity.weight = decayed(entity.weight, entity.weight_as_of, now, half_life);
            entity.weight_as_of = entity.weight_as_of.max(now);
        });
        self.graph.update_relations(|rel| {
            rel.weight = decayed(rel.weight, rel.weight_as_of, now, half_life);
            rel.weight_as_of = rel.weight_as_of.max(now);
        });

        let pruned = pruning::prune(
            &mut self.graph,
            self.config.prune_floor,
            self.config.activity_grace_secs as f64,
            now,
        );

        let version = self.publish(now)?;
        events::graph_decayed(version, pruned.entities_removed.len(), pruned.edges_removed);
        Ok(DecayReport {
            version,
            entities_pruned: pruned.entities_removed,
            edges_pruned: pruned.edges_removed,
        })
    }

    fn new_entity(
        &self,
        id: EntityId,
        candidate: &EntityCandidate,
        confidence: f64,
        source: Option<&Mention>,
        now: DateTime<Utc>,
    ) -> Entity {
        let mut mentions = VecDeque::new();
        if let Some(m) = source {
            if self.config.max_mentions_per_entity > 0 {
                mentions.push_back(m.clone());
            }
        }
        Entity {
            id,
            etype: recall_core::ids::normalize_type(&candidate.etype),
            value: recall_core::ids::normalize_value(&candidate.value),
            first_seen: now,
            last_seen: now,
            occurrences: 1,
            weight: clamp_unit(confidence),
            weight_as_of: now,
            mentions,
        }
    }

    fn refresh_entity(&mut self, id: &EntityId, confidence: f64, source: Option<&Mention>, now: DateTime<Utc>) {
        let half_life = self.config.half_life_secs as f64;
        let gain = self.config.reinforcement * confidence;
        let max_mentions = self.config.max_mentions_per_entity;
        let Some(entity) = self.graph.entity_mut(id) else {
            return;
        };
        entity.weight = reinforce(decayed(entity.weight, entity.weight_as_of, now, half_life), gain);
        entity.weight_as_of = entity.weight_as_of.max(now);
        entity.last_seen = entity.last_seen.max(now);
        entity.occurrences += 1;
        if let Some(m) = source {
            if entity.mentions.back().map(|last| last.log_id) != Some(m.log_id) {
                entity.mentions.push_back(m.clone());
            }
            while entity.mentions.len() > max_mentions {
                entity.mentions.pop_front();
            }
        }
    }

    fn publish(&mut self, now: DateTime<Utc>) -> RecallResult<u64> {
        self.version += 1;
        let snapshot = Arc::new(GraphSnapshot::new(self.version, Some(now), self.graph.clone()));
        self.current = Arc::clone(&snapshot);
        let mut slot = self
            .published
            .write()
            .map_err(|e| RecallError::Concurrency(format!("snapshot lock poisoned: {e}")))?;
        *slot = snapshot;
        Ok(self.version)
    }
}

fn validate_confidence(item: &str, confidence: f64) -> Result<(), GraphError> {
    if confidence.is_finite() && (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight {
            item: item.to_string(),
            value: confidence,
        })
    }
}

fn validate_entity(candidate: &EntityCandidate) -> Result<EntityId, GraphError> {
    let id = candidate.id().ok_or_else(|| GraphError::MalformedCandidate {
        reason: format!(
            "entity needs a non-empty type and value, got ({:?}, {:?})",
            candidate.etype, candidate.value
        ),
    })?;
    validate_confidence(id.as_str(), candidate.confidence)?;
    Ok(id)
}

fn validate_relation(candidate: &RelationCandidate) -> Result<EdgeKey, GraphError> {
    let src = EntityId::parse(&candidate.src)?;
    let dst = EntityId::parse(&candidate.dst)?;
    let kind = candidate.kind.trim().to_lowercase();
    if kind.is_empty() {
        return Err(GraphError::MalformedCandidate {
            reason: "relation kind is empty".to_string(),
        });
    }
    if src == dst {
        return Err(GraphError::MalformedCandidate {
            reason: format!("self-relation on {src}"),
        });
    }
    let key = EdgeKey { src, dst, kind };
    validate_confidence(&key.to_string(), candidate.confidence)?;
    Ok(key)
}
