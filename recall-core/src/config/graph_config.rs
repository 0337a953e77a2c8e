use serde::{Deserialize, Serialize};

use super::defaults;

/// Graph store configuration: aging and pruning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Half-life of entity and edge weights (seconds).
    pub half_life_secs: u64,
    /// Weight below which entities and edges become prunable.
    pub prune_floor: f64,
    /// Minimum quiet time before a low-weight entity is pruned (seconds).
    pub activity_grace_secs: u64,
    /// Number of recent mentions retained per entity.
    pub max_mentions_per_entity: usize,
    /// Weight gain per sighting (probabilistic OR with candidate confidence).
    pub reinforcement: f64,
    /// Run a decay pass after this many ingested lines.
    pub decay_every_lines: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            half_life_secs: defaults::DEFAULT_HALF_LIFE_SECS,
            prune_floor: defaults::DEFAULT_PRUNE_FLOOR,
            activity_grace_secs: defaults::DEFAULT_ACTIVITY_GRACE_SECS,
            max_mentions_per_entity: defaults::DEFAULT_MAX_MENTIONS_PER_ENTITY,
            reinforcement: defaults::DEFAULT_REINFORCEMENT,
            decay_every_lines: defaults::DEFAULT_DECAY_EVERY_LINES,
        }
    }
}
