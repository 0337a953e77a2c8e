use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use recall_core::config::ExtractionConfig;
use recall_core::errors::ExtractionError;
use recall_core::ids::EntityId;
use recall_core::models::Extraction;

fn compile(patterns: &[String]) -> Result<Vec<Regex>, ExtractionError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| ExtractionError::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Entity blacklist and token drop rules.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    exact: HashSet<String>,
    blacklist: Vec<Regex>,
    drop: Vec<Regex>,
}

impl EntityFilter {
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            exact: config.blacklist_exact.iter().cloned().collect(),
            blacklist: compile(&config.blacklist_regex)?,
            drop: compile(&config.token_drop_regex)?,
        })
    }

    /// Values that must never become entities. Blank values are always
    /// blacklisted.
    pub fn is_blacklisted(&self, value: &str) -> bool {
        let v = value.trim();
        v.is_empty() || self.exact.contains(v) || self.blacklist.iter().any(|r| r.is_match(v))
    }

    /// Tokens to ignore before any entity test.
    pub fn should_drop(&self, token: &str) -> bool {
        token.is_empty() || self.drop.iter().any(|r| r.is_match(token))
    }

    /// Remove blacklisted entities, and relations touching them, from an
    /// extractor's output. Returns how many entities were removed.
    pub fn retain(&self, extraction: &mut Extraction) -> usize {
        let mut removed: BTreeSet<EntityId> = BTreeSet::new();
        let before = extraction.entities.len();
        extraction.entities.retain(|c| {
            if self.is_blacklisted(&c.value) {
                if let Some(id) = c.id() {
                    removed.insert(id);
                }
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            extraction
                .relations
                .retain(|r| !removed.iter().any(|id| id.as_str() == r.src || id.as_str() == r.dst));
        }
        before - extraction.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::models::{EntityCandidate, RelationCandidate};

    fn filter() -> EntityFilter {
        EntityFilter::from_config(&ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn default_blacklist() {
        let f = filter();
        assert!(f.is_blacklisted("127.0.0.1"));
        assert!(f.is_blacklisted(" localhost "));
        assert!(f.is_blacklisted("::1"));
        assert!(f.is_blacklisted(""));
        assert!(!f.is_blacklisted("10.0.0.1"));
    }

    #[test]
    fn drops_timestamps() {
        assert!(filter().should_drop("2005-06-03-15.42.50.675872"));
        assert!(!filter().should_drop("blk_1"));
    }

    #[test]
    fn retain_removes_relations_to_blacklisted() {
        let good = EntityCandidate::new("ip", "10.0.0.1");
        let bad = EntityCandidate::new("ip", "127.0.0.1");
        let mut extraction = Extraction {
            entities: vec![good.clone(), bad.clone()],
            relations: vec![RelationCandidate::between(&good, &bad, "co_occurs").unwrap()],
        };
        assert_eq!(filter().retain(&mut extraction), 1);
        assert_eq!(extraction.entities, vec![good]);
        assert!(extraction.relations.is_empty());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let config = ExtractionConfig {
            blacklist_regex: vec!["([".to_string()],
            ..ExtractionConfig::default()
        };
        assert!(matches!(
            EntityFilter::from_config(&config),
            Err(ExtractionError::InvalidPattern { .. })
        ));
    }
}
