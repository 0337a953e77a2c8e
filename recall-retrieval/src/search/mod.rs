//! The two retrieval paths. Temporal context rides on the structural path.

pub mod semantic;
pub mod structural;
pub mod temporal;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::ids::LogId;
use recall_core::models::{EvidenceRef, QueryOrigin};

pub use semantic::SemanticSearch;
pub use structural::StructuralSearch;
pub use temporal::{Anchor, ContextWeights, TemporalContext};

/// One result of a single path, before merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathHit {
    pub reference: EvidenceRef,
    /// Raw path score: cosine similarity, traversal path score, or context
    /// score.
    pub score: f64,
    pub last_seen: DateTime<Utc>,
    pub text: Option<String>,
    pub source_log: Option<LogId>,
    pub origin: QueryOrigin,
}
