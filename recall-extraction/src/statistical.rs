use std::sync::Mutex;

use recall_core::config::ExtractionConfig;
use recall_core::errors::ExtractionError;
use recall_core::models::{EntityCandidate, Extraction, LogLine, RelationCandidate};
use recall_core::traits::IEntityExtractor;

use crate::classify::{classify_entity_type, split_ip_port};
use crate::filter::EntityFilter;
use crate::recurrence::TokenRecurrenceCounter;
use crate::tokenizer::{token_complexity, tokenize_candidates};

/// Local extractor driven by token shape and recurrence.
///
/// A token becomes an entity when its character-class complexity exceeds
/// `theta_tc` and it appeared in more than `theta_rf` lines inside the
/// recurrence window. The IP of an `ip:port` token is always an entity.
/// Entities of one line are pairwise linked with `cooccurrence_kind`.
pub struct StatisticalExtractor {
    config: ExtractionConfig,
    filter: EntityFilter,
    recurrence: Mutex<TokenRecurrenceCounter>,
}

impl StatisticalExtractor {
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        let filter = EntityFilter::from_config(&config)?;
        let recurrence = Mutex::new(TokenRecurrenceCounter::new(config.recurrence_window_secs));
        Ok(Self {
            config,
            filter,
            recurrence,
        })
    }

    fn select_values(&self, line: &LogLine) -> Result<Vec<String>, ExtractionError> {
        let tokens = tokenize_candidates(&line.text);
        let mut recurrence = self.recurrence.lock().map_err(|e| ExtractionError::LineFailed {
            line: line.id,
            reason: format!("recurrence counter lock poisoned: {e}"),
        })?;
        recurrence.push(line.ts, tokens.iter().copied());

        let mut values: Vec<String> = Vec::new();
        let mut push = |v: &str| {
            if !values.iter().any(|x| x == v) {
                values.push(v.to_string());
            }
        };
        for tok in tokens {
            if tok.chars().count() < self.config.min_token_len || self.filter.should_drop(tok) {
                continue;
            }
            if let Some(ip) = split_ip_port(tok.trim_start_matches('/')) {
                if !self.filter.is_blacklisted(ip) {
                    push(ip);
                }
            }
            if self.filter.is_blacklisted(tok) {
                continue;
            }
            if token_complexity(tok) > self.config.theta_tc && recurrence.rf(tok) > self.config.theta_rf {
                push(tok);
            }
        }
        Ok(values)
    }
}

impl IEntityExtractor for StatisticalExtractor {
    fn extract(&self, line: &LogLine) -> Result<Extraction, ExtractionError> {
        let mut values = self.select_values(line)?;
        values.truncate(self.config.max_entities_per_line);

        let entities: Vec<EntityCandidate> = values
            .iter()
            .map(|v| EntityCandidate::new(classify_entity_type(v), v.as_str()))
            .collect();

        let mut relations = Vec::new();
        for (i, a) in entities.iter().enumerate() {
            for b in &entities[i + 1..] {
                let (Some(ia), Some(ib)) = (a.id(), b.id()) else {
                    continue;
                };
                let (src, dst) = if ia <= ib { (a, b) } else { (b, a) };
                if let Some(rel) = RelationCandidate::between(src, dst, &self.config.cooccurrence_kind) {
                    if rel.src != rel.dst {
                        relations.push(rel);
                    }
                }
            }
        }

        tracing::trace!(line = %line.id, entities = entities.len(), relations = relations.len(), "extracted");
        Ok(Extraction { entities, relations })
    }

    fn name(&self) -> &str {
        "statistical"
    }
}
