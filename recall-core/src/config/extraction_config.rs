use serde::{Deserialize, Serialize};

use super::defaults;

/// Statistical extractor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum character-class transitions for a token to be an entity.
    pub theta_tc: usize,
    /// Minimum recurrences inside the window for a token to be an entity.
    pub theta_rf: usize,
    pub recurrence_window_secs: u64,
    pub min_token_len: usize,
    pub max_entities_per_line: usize,
    /// Relation kind emitted between entities of the same line.
    pub cooccurrence_kind: String,
    pub blacklist_exact: Vec<String>,
    pub blacklist_regex: Vec<String>,
    pub token_drop_regex: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            theta_tc: defaults::DEFAULT_THETA_TC,
            theta_rf: defaults::DEFAULT_THETA_RF,
            recurrence_window_secs: defaults::DEFAULT_RECURRENCE_WINDOW_SECS,
            min_token_len: defaults::DEFAULT_MIN_TOKEN_LEN,
            max_entities_per_line: defaults::DEFAULT_MAX_ENTITIES_PER_LINE,
            cooccurrence_kind: defaults::DEFAULT_COOCCURRENCE_KIND.to_string(),
            blacklist_exact: defaults::strings(defaults::DEFAULT_BLACKLIST_EXACT),
            blacklist_regex: defaults::strings(defaults::DEFAULT_BLACKLIST_REGEX),
            token_drop_regex: defaults::strings(defaults::DEFAULT_TOKEN_DROP_REGEX),
        }
    }
}
