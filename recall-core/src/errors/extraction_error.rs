use crate::ids::LogId;

/// Entity extraction errors. A failed line contributes nothing to the graph.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction failed for line {line}: {reason}")]
    LineFailed { line: LogId, reason: String },

    #[error("extractor backend unavailable: {backend}")]
    BackendUnavailable { backend: String },

    #[error("invalid extractor pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
