//! OpenAI-compatible `/embeddings` endpoint provider.
//!
//! Blocking client: call it from a blocking context (the retriever runs the
//! semantic path on tokio's blocking pool). After repeated failures the
//! provider reports itself unavailable for a backoff period.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use recall_core::config::EmbeddingConfig;
use recall_core::errors::{ConfigError, EmbeddingError, RecallResult};
use recall_core::traits::IEmbeddingProvider;

const DEFAULT_MODEL: &str = "text-embedding-3-small";
const MAX_RETRIES: u32 = 2;
const UNAVAILABLE_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

pub struct HttpEmbeddingProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
    timeout_ms: u64,
    unavailable_until: Mutex<Option<Instant>>,
}

impl HttpEmbeddingProvider {
    pub fn new(
        endpoint: String,
        model: Option<String>,
        api_key: Option<String>,
        dimensions: usize,
        timeout_ms: u64,
    ) -> RecallResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::RequestFailed {
                reason: format!("client build error: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            dimensions,
            timeout_ms,
            unavailable_until: Mutex::new(None),
        })
    }

    /// Build from config. The API key is read from `api_key_env` if set.
    pub fn from_config(config: &EmbeddingConfig) -> RecallResult<Self> {
        let endpoint = config.http_endpoint.clone().ok_or_else(|| ConfigError::Invalid {
            field: "embedding.http_endpoint".to_string(),
            reason: "required for the http provider".to_string(),
        })?;
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        Self::new(
            endpoint,
            config.http_model.clone(),
            api_key,
            config.dimensions,
            config.http_timeout_ms,
        )
    }

    fn mark_unavailable(&self) {
        if let Ok(mut slot) = self.unavailable_until.lock() {
            *slot = Some(Instant::now() + UNAVAILABLE_BACKOFF);
        }
    }

    fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if !self.is_available() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
            });
        }

        let mut last_err = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                std::thread::sleep(Duration::from_millis(100 * 2u64.pow(attempt - 1)));
                debug!(attempt, "retrying embedding request");
            }
            match self.send_request(texts) {
                Ok(vectors) => return Ok(vectors),
                Err(e @ EmbeddingError::Timeout { .. }) => {
                    warn!(error = %e, "embedding request timed out");
                    last_err = Some(e);
                    break;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        self.mark_unavailable();
        Err(last_err.unwrap_or_else(|| EmbeddingError::RequestFailed {
            reason: "all retries exhausted".to_string(),
        }))
    }

    fn send_request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbedRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| self.map_transport_error(e))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::RequestFailed {
                reason: format!("endpoint returned {status}: {body}"),
            });
        }

        let mut parsed: EmbedResponse = response.json().map_err(|e| self.map_transport_error(e))?;
        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("expected {} embeddings, got {}", texts.len(), parsed.data.len()),
            });
        }
        parsed.data.sort_by_key(|d| d.index.unwrap_or(0));

        parsed
            .data
            .into_iter()
            .map(|d| {
                if d.embedding.len() == self.dimensions {
                    Ok(d.embedding)
                } else {
                    Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: d.embedding.len(),
                    })
                }
            })
            .collect()
    }

    fn map_transport_error(&self, e: reqwest::Error) -> EmbeddingError {
        if e.is_timeout() {
            EmbeddingError::Timeout {
                provider: self.name().to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            EmbeddingError::RequestFailed {
                reason: e.to_string(),
            }
        }
    }
}

impl IEmbeddingProvider for HttpEmbeddingProvider {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        let vectors = self.request_embeddings(std::slice::from_ref(&text.to_string()))?;
        vectors.into_iter().next().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> RecallResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.request_embeddings(texts)?)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "http"
    }

    fn is_available(&self) -> bool {
        match self.unavailable_until.lock() {
            Ok(slot) => slot.map_or(true, |until| Instant::now() >= until),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::errors::RecallError;

    #[test]
    fn from_config_requires_endpoint() {
        let config = EmbeddingConfig {
            provider: "http".to_string(),
            ..EmbeddingConfig::default()
        };
        assert!(HttpEmbeddingProvider::from_config(&config).is_err());
    }

    #[test]
    fn unreachable_endpoint_fails_and_backs_off() {
        // Port 9 (discard) on localhost is closed on test machines.
        let provider =
            HttpEmbeddingProvider::new("http://127.0.0.1:9/v1/embeddings".to_string(), None, None, 8, 200).unwrap();
        assert!(provider.is_available());
        assert!(provider.embed("hello").is_err());
        assert!(!provider.is_available());
        assert!(matches!(
            provider.embed("hello"),
            Err(RecallError::EmbeddingError(EmbeddingError::ProviderUnavailable { .. }))
        ));
    }
}
