use serde::{Deserialize, Serialize};

use super::defaults;

/// Trigger evaluator configuration.
///
/// Novelty accumulated per graph version:
/// `Σ gain(entity) * weight(entity)` over touched entities whose weight is at
/// least `high_weight_threshold`, where `gain` is `new_entity_gain` for newly
/// created entities and `updated_entity_gain` otherwise. The evaluated score
/// adds `elapsed_gain_per_min * minutes since the last fire`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub novelty_threshold: f64,
    pub high_weight_threshold: f64,
    pub new_entity_gain: f64,
    pub updated_entity_gain: f64,
    pub elapsed_gain_per_min: f64,
    /// Fire after this long without a fire if anything is pending (seconds).
    pub max_wait_secs: u64,
    /// Minimum interval between two fires (seconds).
    pub cooldown_secs: u64,
    /// Half-life of the recency factor used to rank seeds (seconds).
    pub recency_half_life_secs: u64,
    pub max_seeds: usize,
    pub enable_severity_trigger: bool,
    pub enable_burst_trigger: bool,
    pub trigger_keywords: Vec<String>,
    pub severity_keywords_fatal: Vec<String>,
    pub severity_keywords_error: Vec<String>,
    pub burst_window_secs: u64,
    pub burst_ema_alpha: f64,
    pub burst_sigma: f64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            novelty_threshold: defaults::DEFAULT_NOVELTY_THRESHOLD,
            high_weight_threshold: defaults::DEFAULT_HIGH_WEIGHT_THRESHOLD,
            new_entity_gain: defaults::DEFAULT_NEW_ENTITY_GAIN,
            updated_entity_gain: defaults::DEFAULT_UPDATED_ENTITY_GAIN,
            elapsed_gain_per_min: defaults::DEFAULT_ELAPSED_GAIN_PER_MIN,
            max_wait_secs: defaults::DEFAULT_MAX_WAIT_SECS,
            cooldown_secs: defaults::DEFAULT_COOLDOWN_SECS,
            recency_half_life_secs: defaults::DEFAULT_RECENCY_HALF_LIFE_SECS,
            max_seeds: defaults::DEFAULT_MAX_SEEDS,
            enable_severity_trigger: defaults::DEFAULT_ENABLE_SEVERITY_TRIGGER,
            enable_burst_trigger: defaults::DEFAULT_ENABLE_BURST_TRIGGER,
            trigger_keywords: defaults::strings(defaults::DEFAULT_TRIGGER_KEYWORDS),
            severity_keywords_fatal: defaults::strings(defaults::DEFAULT_SEVERITY_KEYWORDS_FATAL),
            severity_keywords_error: defaults::strings(defaults::DEFAULT_SEVERITY_KEYWORDS_ERROR),
            burst_window_secs: defaults::DEFAULT_BURST_WINDOW_SECS,
            burst_ema_alpha: defaults::DEFAULT_BURST_EMA_ALPHA,
            burst_sigma: defaults::DEFAULT_BURST_SIGMA,
        }
    }
}
