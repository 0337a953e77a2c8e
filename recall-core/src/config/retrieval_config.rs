use serde::{Deserialize, Serialize};

use super::defaults;

/// Dual-path retrieval and merge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Merge weight of the semantic path; structural gets `1 - alpha`.
    pub alpha: f64,
    /// Nearest neighbors fetched by the semantic path.
    pub semantic_top_k: usize,
    /// Maximum BFS depth of the structural path.
    pub max_depth: usize,
    /// Maximum nodes reported by the structural path.
    pub max_nodes: usize,
    /// Per-hop multiplier applied to structural path scores.
    pub depth_decay: f64,
    /// Edges lighter than this are not traversed.
    pub min_edge_weight: f64,
    /// Nodes with a higher degree are reported but not expanded.
    pub max_degree: usize,
    /// Cap on merged evidence items.
    pub max_evidence: usize,
    /// Per-path timeout (milliseconds).
    pub path_timeout_ms: u64,
    /// Lines taken on each side of the firing line for temporal context.
    /// Zero disables it.
    pub temporal_k: usize,
    /// Half-life of the recency term for lines before the firing line.
    pub temporal_half_life_secs: u64,
    /// Context score is `severity_weight * sev / 3 + proximity_weight / dist
    /// + recency_weight * w`, divided by the sum of the weights.
    pub severity_weight: f64,
    pub proximity_weight: f64,
    pub recency_weight: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            alpha: defaults::DEFAULT_ALPHA,
            semantic_top_k: defaults::DEFAULT_SEMANTIC_TOP_K,
            max_depth: defaults::DEFAULT_MAX_DEPTH,
            max_nodes: defaults::DEFAULT_MAX_NODES,
            depth_decay: defaults::DEFAULT_DEPTH_DECAY,
            min_edge_weight: defaults::DEFAULT_MIN_EDGE_WEIGHT,
            max_degree: defaults::DEFAULT_MAX_DEGREE,
            max_evidence: defaults::DEFAULT_MAX_EVIDENCE,
            path_timeout_ms: defaults::DEFAULT_PATH_TIMEOUT_MS,
            temporal_k: defaults::DEFAULT_TEMPORAL_K,
            temporal_half_life_secs: defaults::DEFAULT_TEMPORAL_HALF_LIFE_SECS,
            severity_weight: defaults::DEFAULT_SEVERITY_WEIGHT,
            proximity_weight: defaults::DEFAULT_PROXIMITY_WEIGHT,
            recency_weight: defaults::DEFAULT_RECENCY_WEIGHT,
        }
    }
}
