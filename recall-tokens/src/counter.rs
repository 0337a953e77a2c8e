use std::sync::Arc;

use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

use recall_core::errors::{RecallError, RecallResult};

/// Token counter wrapping tiktoken's cl100k_base tokenizer.
/// Caches results per blake3 content hash.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    cache: Cache<String, usize>,
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("cached_entries", &self.cache.entry_count())
            .finish()
    }
}

impl TokenCounter {
    pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

    /// Create a counter with the given cache capacity.
    pub fn new(cache_capacity: u64) -> RecallResult<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| RecallError::TokenizerUnavailable {
            reason: e.to_string(),
        })?;
        Ok(Self {
            bpe: Arc::new(bpe),
            cache: Cache::new(cache_capacity),
        })
    }

    pub fn with_default_capacity() -> RecallResult<Self> {
        Self::new(Self::DEFAULT_CACHE_CAPACITY)
    }

    /// Count tokens in the given text (uncached).
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Count tokens with blake3 content-hash caching.
    pub fn count_cached(&self, text: &str) -> usize {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }
}
