/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("{path} path timed out after {timeout_ms}ms")]
    ProviderTimeout { path: String, timeout_ms: u64 },

    #[error("{path} path failed: {reason}")]
    PathFailed { path: String, reason: String },

    #[error("budget exceeded: needed {needed}, available {available}")]
    BudgetExceeded { needed: usize, available: usize },

    #[error("no seed entities for retrieval")]
    NoSeeds,
}
