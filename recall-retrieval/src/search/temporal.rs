//! Temporal context: the indexed lines logged just before and after the line
//! that fired the trigger.
//!
//! A neighbor at step distance `dist` scores
//! `(a * sev / 3 + b / dist + c * w) / (a + b + c)`, where `sev` is the
//! line's severity level and `w` decays with the time between the neighbor
//! and the anchor. Lines after the anchor have `w = 1`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::config::RetrievalConfig;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::ids::LogId;
use recall_core::models::{EvidenceRef, QueryOrigin};
use recall_embeddings::SharedIndex;
use recall_graph::formula::{decay_factor, elapsed_secs};

use super::PathHit;

const MAX_SEVERITY: f64 = 3.0;

/// The line a cycle is centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub log_id: LogId,
    pub ts: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextWeights {
    pub severity: f64,
    pub proximity: f64,
    pub recency: f64,
}

impl ContextWeights {
    fn total(&self) -> f64 {
        self.severity + self.proximity + self.recency
    }
}

pub struct TemporalContext {
    index: SharedIndex,
    k: usize,
    half_life_secs: f64,
    weights: ContextWeights,
}

impl TemporalContext {
    pub fn new(index: SharedIndex, k: usize, half_life_secs: f64, weights: ContextWeights) -> Self {
        Self {
            index,
            k,
            half_life_secs,
            weights,
        }
    }

    pub fn from_config(config: &RetrievalConfig, index: SharedIndex) -> Self {
        Self::new(
            index,
            config.temporal_k,
            config.temporal_half_life_secs as f64,
            ContextWeights {
                severity: config.severity_weight,
                proximity: config.proximity_weight,
                recency: config.recency_weight,
            },
        )
    }

    pub fn score(&self, severity: u8, distance: usize, recency: f64) -> f64 {
        let total = self.weights.total();
        if total <= 0.0 {
            return 0.0;
        }
        let sev = (f64::from(severity) / MAX_SEVERITY).min(1.0);
        let proximity = 1.0 / distance.max(1) as f64;
        (self.weights.severity * sev + self.weights.proximity * proximity + self.weights.recency * recency) / total
    }

    /// Neighbors of `anchor`, nearest first on each side.
    pub fn search(&self, anchor: Anchor) -> RecallResult<Vec<PathHit>> {
        if self.k == 0 {
            return Ok(Vec::new());
        }
        let index = self
            .index
            .read()
            .map_err(|e| RecallError::Concurrency(format!("vector index lock poisoned: {e}")))?;

        Ok(index
            .around(anchor.log_id, self.k)
            .into_iter()
            .map(|(distance, snippet)| {
                let recency = decay_factor(elapsed_secs(snippet.ts, anchor.ts), self.half_life_secs);
                PathHit {
                    reference: EvidenceRef::Snippet(snippet.log_id),
                    score: self.score(snippet.severity, distance, recency),
                    last_seen: snippet.ts,
                    text: Some(snippet.text.clone()),
                    source_log: Some(snippet.log_id),
                    origin: QueryOrigin::Temporal {
                        anchor: anchor.log_id,
                        distance,
                    },
                }
            })
            .collect())
    }
}
