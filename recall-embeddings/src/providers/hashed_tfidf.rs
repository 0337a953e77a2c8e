//! Feature-hashed TF-IDF provider.
//!
//! Fixed-dimension vectors from term frequencies hashed into buckets. Runs
//! fully offline; the default provider.

use std::collections::HashMap;

use recall_core::errors::RecallResult;
use recall_core::traits::IEmbeddingProvider;

use crate::similarity::l2_normalize;

pub struct HashedTfIdfProvider {
    dimensions: usize,
}

impl HashedTfIdfProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a bucket for a term.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    /// Lowercase terms. Digits are folded to `0` so block ids and ports of
    /// the same shape land near each other.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_' && c != '.')
            .map(|s| s.trim_matches('.'))
            .filter(|s| s.len() >= 2)
            .flat_map(|s| {
                let lower = s.to_lowercase();
                let folded: String = lower.chars().map(|c| if c.is_ascii_digit() { '0' } else { c }).collect();
                if folded == lower {
                    vec![lower]
                } else {
                    vec![lower, folded]
                }
            })
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms are rarer in logs; short ones behave like stopwords.
            let idf = 1.0 + (term.len() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += freq * idf;
        }

        l2_normalize(&mut vec);
        vec
    }
}

impl IEmbeddingProvider for HashedTfIdfProvider {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> RecallResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-tfidf"
    }

    fn is_available(&self) -> bool {
        true
    }
}
