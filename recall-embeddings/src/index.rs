//! In-memory index of embedded log snippets.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use recall_core::errors::EmbeddingError;
use recall_core::ids::{EntityId, LogId};

use crate::similarity::{dot, l2_normalize};

/// Index shared between the ingest writer and retrieval readers.
pub type SharedIndex = Arc<RwLock<VectorIndex>>;

/// One indexed log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedSnippet {
    pub log_id: LogId,
    pub ts: DateTime<Utc>,
    pub text: String,
    /// Entities extracted from this line.
    pub entities: Vec<EntityId>,
    /// 0 (info) to 3 (fatal).
    #[serde(default)]
    pub severity: u8,
    /// Unit-length embedding.
    pub vector: Vec<f32>,
}

/// A search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub log_id: LogId,
    pub ts: DateTime<Utc>,
    pub text: String,
    pub entities: Vec<EntityId>,
    /// Cosine similarity to the query.
    pub score: f32,
}

/// Capacity-bounded snippet store. Oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimensions: usize,
    capacity: usize,
    entries: VecDeque<IndexedSnippet>,
}

impl VectorIndex {
    pub fn new(dimensions: usize, capacity: usize) -> Self {
        Self {
            dimensions,
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn shared(dimensions: usize, capacity: usize) -> SharedIndex {
        Arc::new(RwLock::new(Self::new(dimensions, capacity)))
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a snippet. The vector is normalized on the way in.
    pub fn insert(&mut self, mut snippet: IndexedSnippet) -> Result<(), EmbeddingError> {
        if snippet.vector.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: snippet.vector.len(),
            });
        }
        l2_normalize(&mut snippet.vector);
        self.entries.push_back(snippet);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        Ok(())
    }

    /// Drop every snippet older than `cutoff`. Returns how many went.
    pub fn evict_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|s| s.ts >= cutoff);
        before - self.entries.len()
    }

    pub fn get(&self, log_id: LogId) -> Option<&IndexedSnippet> {
        self.entries.iter().find(|s| s.log_id == log_id)
    }

    /// Up to `k` indexed lines on each side of `anchor`, paired with their
    /// step distance from it. The anchor itself is not returned; when it was
    /// never indexed, distances count from where it would sit.
    pub fn around(&self, anchor: LogId, k: usize) -> Vec<(usize, &IndexedSnippet)> {
        let split = self.entries.partition_point(|s| s.log_id < anchor);
        let after_start = match self.entries.get(split) {
            Some(s) if s.log_id == anchor => split + 1,
            _ => split,
        };

        let before = self
            .entries
            .range(..split)
            .rev()
            .take(k)
            .enumerate()
            .map(|(i, s)| (i + 1, s));
        let after = self
            .entries
            .range(after_start..)
            .take(k)
            .enumerate()
            .map(|(i, s)| (i + 1, s));
        before.chain(after).collect()
    }

    /// Top `k` snippets by cosine similarity to `query`, best first.
    /// Ties go to the more recent line. Non-positive scores are dropped.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, EmbeddingError> {
        if query.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        let mut q = query.to_vec();
        l2_normalize(&mut q);

        let mut scored: Vec<(f32, &IndexedSnippet)> = self
            .entries
            .par_iter()
            .map(|s| (dot(&q, &s.vector), s))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.log_id.cmp(&a.1.log_id)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, s)| SearchHit {
                log_id: s.log_id,
                ts: s.ts,
                text: s.text.clone(),
                entities: s.entities.clone(),
                score,
            })
            .collect())
    }
}
