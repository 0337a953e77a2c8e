//! DualPathRetriever: runs both paths concurrently against one snapshot,
//! each under its own timeout, then merges.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use recall_core::config::RetrievalConfig;
use recall_core::errors::RetrievalError;
use recall_core::ids::EntityId;
use recall_core::models::EvidenceItem;
use recall_core::traits::IEmbeddingProvider;
use recall_embeddings::SharedIndex;
use recall_graph::GraphSnapshot;
use recall_observability::events;

use crate::ranking::Merger;
use crate::search::{Anchor, PathHit, SemanticSearch, StructuralSearch, TemporalContext};

pub const SEMANTIC_PATH: &str = "semantic";
pub const STRUCTURAL_PATH: &str = "structural";

/// How one path ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathStatus {
    Ok,
    Failed { reason: String },
    TimedOut { timeout_ms: u64 },
}

impl PathStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The failure as a retrieval error, or `None` when the path succeeded.
    pub fn to_error(&self, path: &str) -> Option<RetrievalError> {
        match self {
            Self::Ok => None,
            Self::Failed { reason } => Some(RetrievalError::PathFailed {
                path: path.to_string(),
                reason: reason.clone(),
            }),
            Self::TimedOut { timeout_ms } => Some(RetrievalError::ProviderTimeout {
                path: path.to_string(),
                timeout_ms: *timeout_ms,
            }),
        }
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            Self::TimedOut { timeout_ms } => write!(f, "timed out after {timeout_ms}ms"),
        }
    }
}

/// Hits of one path plus its status. A degraded path has no hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOutcome {
    pub status: PathStatus,
    pub hits: Vec<PathHit>,
}

impl PathOutcome {
    fn degraded(status: PathStatus) -> Self {
        Self {
            status,
            hits: Vec::new(),
        }
    }
}

/// Everything one retrieval cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    pub cycle_id: String,
    /// Snapshot version both paths read.
    pub version: u64,
    pub seeds: Vec<EntityId>,
    pub semantic: PathOutcome,
    pub structural: PathOutcome,
    /// Merged, ranked, capped.
    pub evidence: Vec<EvidenceItem>,
    /// At least one path failed or timed out.
    pub partial: bool,
}

/// Runs the semantic and structural paths concurrently on the blocking pool.
pub struct DualPathRetriever {
    semantic: Arc<SemanticSearch>,
    structural: Arc<StructuralSearch>,
    temporal: Option<Arc<TemporalContext>>,
    merger: Merger,
    timeout: Duration,
}

impl DualPathRetriever {
    pub fn new(semantic: SemanticSearch, structural: StructuralSearch, merger: Merger, timeout: Duration) -> Self {
        Self {
            semantic: Arc::new(semantic),
            structural: Arc::new(structural),
            temporal: None,
            merger,
            timeout,
        }
    }

    /// Also collect the lines around the cycle's anchor on the structural
    /// path.
    pub fn with_temporal(mut self, temporal: TemporalContext) -> Self {
        self.temporal = Some(Arc::new(temporal));
        self
    }

    pub fn from_config(
        config: &RetrievalConfig,
        provider: Arc<dyn IEmbeddingProvider>,
        index: SharedIndex,
    ) -> Self {
        Self::new(
            SemanticSearch::new(provider, Arc::clone(&index), config.semantic_top_k),
            StructuralSearch::from_config(config),
            Merger::from_config(config),
            Duration::from_millis(config.path_timeout_ms),
        )
        .with_temporal(TemporalContext::from_config(config, index))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retrieve and merge. Never fails: a path that errors, panics, or
    /// exceeds the timeout is reported in its [`PathStatus`] and contributes
    /// no hits. With an `anchor`, the structural path also returns the
    /// anchor's temporal neighbors.
    pub async fn retrieve(
        &self,
        snapshot: Arc<GraphSnapshot>,
        seeds: Vec<EntityId>,
        anchor: Option<Anchor>,
        cycle_id: &str,
    ) -> RetrievalOutcome {
        let seeds = Arc::new(seeds);

        let semantic_task = {
            let search = Arc::clone(&self.semantic);
            let snapshot = Arc::clone(&snapshot);
            let seeds = Arc::clone(&seeds);
            tokio::task::spawn_blocking(move || {
                search
                    .search(&snapshot, &seeds)
                    .map_err(|e| e.to_string())
            })
        };
        let structural_task = {
            let search = Arc::clone(&self.structural);
            let snapshot = Arc::clone(&snapshot);
            let seeds = Arc::clone(&seeds);
            let temporal = self.temporal.clone();
            tokio::task::spawn_blocking(move || {
                let mut hits = search.search(&snapshot, &seeds);
                if let (Some(temporal), Some(anchor)) = (temporal, anchor) {
                    hits.extend(temporal.search(anchor).map_err(|e| e.to_string())?);
                }
                Ok::<_, String>(hits)
            })
        };

        let (semantic, structural) = tokio::join!(
            self.bounded(SEMANTIC_PATH, semantic_task),
            self.bounded(STRUCTURAL_PATH, structural_task),
        );

        let evidence = self.merger.merge(cycle_id, &semantic.hits, &structural.hits);
        let partial = !semantic.status.is_ok() || !structural.status.is_ok();
        RetrievalOutcome {
            cycle_id: cycle_id.to_string(),
            version: snapshot.version(),
            seeds: Arc::try_unwrap(seeds).unwrap_or_else(|shared| (*shared).clone()),
            semantic,
            structural,
            evidence,
            partial,
        }
    }

    async fn bounded(
        &self,
        path: &str,
        task: tokio::task::JoinHandle<Result<Vec<PathHit>, String>>,
    ) -> PathOutcome {
        let outcome = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(hits))) => PathOutcome {
                status: PathStatus::Ok,
                hits,
            },
            Ok(Ok(Err(reason))) => PathOutcome::degraded(PathStatus::Failed { reason }),
            Ok(Err(join_error)) => PathOutcome::degraded(PathStatus::Failed {
                reason: format!("task aborted: {join_error}"),
            }),
            Err(_) => PathOutcome::degraded(PathStatus::TimedOut {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };
        if !outcome.status.is_ok() {
            events::path_degraded(path, &outcome.status.to_string());
        }
        outcome
    }
}
