//! Error taxonomy. Each subsystem has its own enum; all of them convert into
//! [`RecallError`] so callers can use `?` across crate boundaries.

mod config_error;
mod embedding_error;
mod extraction_error;
mod graph_error;
mod retrieval_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use extraction_error::ExtractionError;
pub use graph_error::GraphError;
pub use retrieval_error::RetrievalError;

/// Top-level error type for the Recall pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    #[error("extraction error: {0}")]
    ExtractionError(#[from] ExtractionError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("tokenizer unavailable: {reason}")]
    TokenizerUnavailable { reason: String },

    #[error("concurrency error: {0}")]
    Concurrency(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("degraded mode: {component} using {fallback}")]
    DegradedMode { component: String, fallback: String },
}

/// Convenience alias used across the workspace.
pub type RecallResult<T> = Result<T, RecallError>;
