//! Embedding providers and their construction from config.

mod hashed_tfidf;
mod http_provider;

use std::sync::Arc;

use recall_core::config::EmbeddingConfig;
use recall_core::errors::{ConfigError, RecallResult};
use recall_core::traits::IEmbeddingProvider;

use crate::cache::CachedProvider;

pub use hashed_tfidf::HashedTfIdfProvider;
pub use http_provider::HttpEmbeddingProvider;

/// Build the configured provider, wrapped in a content-hash cache unless
/// `cache_capacity` is 0.
pub fn create_provider(config: &EmbeddingConfig) -> RecallResult<Arc<dyn IEmbeddingProvider>> {
    let base: Arc<dyn IEmbeddingProvider> = match config.provider.as_str() {
        "hashed-tfidf" => Arc::new(HashedTfIdfProvider::new(config.dimensions)),
        "http" => Arc::new(HttpEmbeddingProvider::from_config(config)?),
        other => {
            return Err(ConfigError::Invalid {
                field: "embedding.provider".to_string(),
                reason: format!("unknown provider {other:?}"),
            }
            .into())
        }
    };
    tracing::info!(provider = base.name(), dimensions = base.dimensions(), "embedding provider ready");

    if config.cache_capacity == 0 {
        return Ok(base);
    }
    Ok(Arc::new(CachedProvider::new(base, config.cache_capacity)))
}
