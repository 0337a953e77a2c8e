use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::LogId;
use crate::models::{EntityCandidate, RelationCandidate};

/// One line of the incoming log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub id: LogId,
    pub ts: DateTime<Utc>,
    pub text: String,
}

impl LogLine {
    pub fn new(id: u64, ts: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            id: LogId(id),
            ts,
            text: text.into(),
        }
    }
}

/// Everything an extractor produced for one line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub entities: Vec<EntityCandidate>,
    pub relations: Vec<RelationCandidate>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }
}
