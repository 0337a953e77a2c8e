use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding provider and vector index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"hashed-tfidf"` or `"http"`.
    pub provider: String,
    pub dimensions: usize,
    pub cache_capacity: u64,
    /// Maximum snippets held by the vector index.
    pub index_capacity: usize,
    /// OpenAI-compatible embeddings endpoint for the `http` provider.
    pub http_endpoint: Option<String>,
    pub http_model: Option<String>,
    pub http_timeout_ms: u64,
    /// Environment variable holding the API key for the `http` provider.
    pub api_key_env: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            cache_capacity: defaults::DEFAULT_EMBEDDING_CACHE_CAPACITY,
            index_capacity: defaults::DEFAULT_INDEX_CAPACITY,
            http_endpoint: None,
            http_model: None,
            http_timeout_ms: defaults::DEFAULT_HTTP_TIMEOUT_MS,
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}
