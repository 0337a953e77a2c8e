use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EdgeKey, EntityId};
use crate::models::EntityCandidate;

/// A directed, typed, weighted edge between two stored entities.
///
/// Both endpoints must exist in the store whenever the relation does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub src: EntityId,
    pub dst: EntityId,
    pub kind: String,
    /// Always in [0.0, 1.0].
    pub weight: f64,
    /// Last sighting that reinforced this edge.
    pub last_updated: DateTime<Utc>,
    /// Instant the weight was last brought up to date (sighting or decay).
    pub weight_as_of: DateTime<Utc>,
}

impl Relation {
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            src: self.src.clone(),
            dst: self.dst.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// A relation as emitted by an extractor. Endpoints are raw identifier
/// strings and are validated by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationCandidate {
    pub src: String,
    pub dst: String,
    pub kind: String,
    pub confidence: f64,
}

impl RelationCandidate {
    pub fn new(src: impl Into<String>, dst: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            kind: kind.into(),
            confidence: 1.0,
        }
    }

    /// Relation between two candidates, or `None` if either has no valid id.
    pub fn between(a: &EntityCandidate, b: &EntityCandidate, kind: &str) -> Option<Self> {
        let src = a.id()?;
        let dst = b.id()?;
        Some(Self::new(src, dst, kind))
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}
