use crate::errors::ExtractionError;
use crate::models::{Extraction, LogLine};

/// Entity/relation extraction backend (local heuristics, local model, or a
/// remote API).
pub trait IEntityExtractor: Send + Sync {
    /// Extract candidates from one log line. An error means the line
    /// contributes nothing to the graph.
    fn extract(&self, line: &LogLine) -> Result<Extraction, ExtractionError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
