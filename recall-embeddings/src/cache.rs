//! In-memory embedding cache in front of any provider.

use std::sync::Arc;

use moka::sync::Cache;

use recall_core::errors::RecallResult;
use recall_core::traits::IEmbeddingProvider;

/// Wraps a provider with a `moka` cache keyed by the blake3 hash of the
/// input text. Only successful embeddings are cached.
pub struct CachedProvider {
    inner: Arc<dyn IEmbeddingProvider>,
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn IEmbeddingProvider>, max_entries: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_entries),
        }
    }

    fn key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl IEmbeddingProvider for CachedProvider {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        let key = Self::key(text);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.as_ref().clone());
        }
        let vector = self.inner.embed(text)?;
        self.cache.insert(key, Arc::new(vector.clone()));
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> RecallResult<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| Self::key(t)).collect();
        let mut out: Vec<Option<Vec<f32>>> = keys
            .iter()
            .map(|k| self.cache.get(k).map(|v| v.as_ref().clone()))
            .collect();

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        if !missing.is_empty() {
            let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let vectors = self.inner.embed_batch(&batch)?;
            for (&i, vector) in missing.iter().zip(vectors) {
                self.cache.insert(keys[i].clone(), Arc::new(vector.clone()));
                out[i] = Some(vector);
            }
        }

        Ok(out.into_iter().map(Option::unwrap_or_default).collect())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl IEmbeddingProvider for CountingProvider {
        fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }
        fn dimensions(&self) -> usize {
            2
        }
        fn name(&self) -> &str {
            "counting"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn repeated_text_hits_cache() {
        let inner = Arc::new(CountingProvider { calls: AtomicUsize::new(0) });
        let cached = CachedProvider::new(inner.clone(), 100);
        let a = cached.embed("blk_1 served").unwrap();
        let b = cached.embed("blk_1 served").unwrap();
        assert_eq!(a, b);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn batch_only_embeds_misses() {
        let inner = Arc::new(CountingProvider { calls: AtomicUsize::new(0) });
        let cached = CachedProvider::new(inner.clone(), 100);
        cached.embed("a").unwrap();
        let out = cached.embed_batch(&["a".to_string(), "bb".to_string()]).unwrap();
        assert_eq!(out, vec![vec![1.0, 1.0], vec![2.0, 1.0]]);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
