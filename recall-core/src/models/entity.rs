use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, LogId};

/// A log line in which an entity was sighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub log_id: LogId,
    pub ts: DateTime<Utc>,
    pub text: String,
}

/// An entity held by the graph store.
///
/// Created on the first sighting of a novel normalized `(type, value)`,
/// refreshed on every later sighting, removed by pruning once its weight has
/// decayed below the floor and it has been quiet for the grace period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub etype: String,
    pub value: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub occurrences: u64,
    /// Decayed weight, always in [0.0, 1.0].
    pub weight: f64,
    /// Instant the weight was last brought up to date (sighting or decay).
    pub weight_as_of: DateTime<Utc>,
    /// Most recent mentions, newest last.
    pub mentions: VecDeque<Mention>,
}

impl Entity {
    /// Most recent mention, if any.
    pub fn latest_mention(&self) -> Option<&Mention> {
        self.mentions.back()
    }
}

/// An entity as emitted by an extractor, before it reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCandidate {
    pub etype: String,
    pub value: String,
    /// Extractor confidence in [0.0, 1.0].
    pub confidence: f64,
}

impl EntityCandidate {
    pub fn new(etype: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            etype: etype.into(),
            value: value.into(),
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Stable id, or `None` when the type or value is empty.
    pub fn id(&self) -> Option<EntityId> {
        EntityId::derive(&self.etype, &self.value)
    }
}
