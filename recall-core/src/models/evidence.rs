use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, LogId};

/// Which retrieval path produced an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathTag {
    Semantic,
    Structural,
    Both,
}

impl PathTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Structural => "structural",
            Self::Both => "both",
        }
    }

    /// Tag after merging with another path's hit on the same item.
    pub fn merge(self, other: PathTag) -> PathTag {
        if self == other {
            self
        } else {
            PathTag::Both
        }
    }
}

impl fmt::Display for PathTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an evidence item points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum EvidenceRef {
    Entity(EntityId),
    Snippet(LogId),
}

impl fmt::Display for EvidenceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(id) => write!(f, "{id}"),
            Self::Snippet(id) => write!(f, "{id}"),
        }
    }
}

/// The query that surfaced an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum QueryOrigin {
    /// Nearest-neighbor lookup for the cycle's seed text.
    SemanticTopK { rank: usize },
    /// Breadth-first traversal from a seed entity.
    Traversal { seed: EntityId, depth: usize },
    /// Neighbor of the firing line, `distance` indexed lines away.
    Temporal { anchor: LogId, distance: usize },
}

/// Where an item came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub cycle_id: String,
    pub origins: Vec<QueryOrigin>,
}

/// One ranked piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub reference: EvidenceRef,
    pub path: PathTag,
    /// Normalized path score kept for the item (max over paths when `Both`).
    pub raw_score: f64,
    pub semantic_score: f64,
    pub structural_score: f64,
    /// `alpha * semantic + (1 - alpha) * structural`.
    pub rank_score: f64,
    pub last_seen: DateTime<Utc>,
    /// Text associated with the item, if any.
    pub text: Option<String>,
    /// Log line the text was taken from.
    pub source_log: Option<LogId>,
    pub provenance: Provenance,
}

impl EvidenceItem {
    pub fn entity_id(&self) -> Option<&EntityId> {
        match &self.reference {
            EvidenceRef::Entity(id) => Some(id),
            EvidenceRef::Snippet(_) => None,
        }
    }
}
