//! Configuration for every subsystem, loadable from TOML.

pub mod defaults;
mod embedding_config;
mod extraction_config;
mod graph_config;
mod observability_config;
mod packer_config;
mod retrieval_config;
mod trigger_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use embedding_config::EmbeddingConfig;
pub use extraction_config::ExtractionConfig;
pub use graph_config::GraphConfig;
pub use observability_config::ObservabilityConfig;
pub use packer_config::{BudgetUnit, PackerConfig};
pub use retrieval_config::RetrievalConfig;
pub use trigger_config::TriggerConfig;

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub graph: GraphConfig,
    pub trigger: TriggerConfig,
    pub retrieval: RetrievalConfig,
    pub packer: PackerConfig,
    pub embedding: EmbeddingConfig,
    pub extraction: ExtractionConfig,
    pub observability: ObservabilityConfig,
}

impl RecallConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Check every cross-field and range constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.graph;
        unit_interval("graph.prune_floor", g.prune_floor)?;
        positive("graph.half_life_secs", g.half_life_secs as f64)?;
        if !(g.reinforcement > 0.0 && g.reinforcement <= 1.0) {
            return Err(invalid("graph.reinforcement", "must be in (0, 1]"));
        }
        if g.decay_every_lines == 0 {
            return Err(invalid("graph.decay_every_lines", "must be at least 1"));
        }

        let t = &self.trigger;
        positive("trigger.novelty_threshold", t.novelty_threshold)?;
        unit_interval("trigger.high_weight_threshold", t.high_weight_threshold)?;
        non_negative("trigger.new_entity_gain", t.new_entity_gain)?;
        non_negative("trigger.updated_entity_gain", t.updated_entity_gain)?;
        non_negative("trigger.elapsed_gain_per_min", t.elapsed_gain_per_min)?;
        positive("trigger.max_wait_secs", t.max_wait_secs as f64)?;
        positive("trigger.recency_half_life_secs", t.recency_half_life_secs as f64)?;
        if t.max_seeds == 0 {
            return Err(invalid("trigger.max_seeds", "must be at least 1"));
        }
        unit_interval("trigger.burst_ema_alpha", t.burst_ema_alpha)?;
        non_negative("trigger.burst_sigma", t.burst_sigma)?;

        let r = &self.retrieval;
        unit_interval("retrieval.alpha", r.alpha)?;
        unit_interval("retrieval.min_edge_weight", r.min_edge_weight)?;
        if !(r.depth_decay > 0.0 && r.depth_decay <= 1.0) {
            return Err(invalid("retrieval.depth_decay", "must be in (0, 1]"));
        }
        if r.max_depth > crate::constants::MAX_TRAVERSAL_DEPTH {
            return Err(invalid(
                "retrieval.max_depth",
                &format!("must be at most {}", crate::constants::MAX_TRAVERSAL_DEPTH),
            ));
        }
        if r.max_evidence == 0 {
            return Err(invalid("retrieval.max_evidence", "must be at least 1"));
        }
        positive("retrieval.path_timeout_ms", r.path_timeout_ms as f64)?;
        positive("retrieval.temporal_half_life_secs", r.temporal_half_life_secs as f64)?;
        non_negative("retrieval.severity_weight", r.severity_weight)?;
        non_negative("retrieval.proximity_weight", r.proximity_weight)?;
        non_negative("retrieval.recency_weight", r.recency_weight)?;
        positive(
            "retrieval.severity_weight + proximity_weight + recency_weight",
            r.severity_weight + r.proximity_weight + r.recency_weight,
        )?;

        if self.packer.budget == 0 {
            return Err(invalid("packer.budget", "must be at least 1"));
        }

        let e = &self.embedding;
        if e.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be at least 1"));
        }
        if e.provider == "http" && e.http_endpoint.is_none() {
            return Err(invalid(
                "embedding.http_endpoint",
                "required when provider = \"http\"",
            ));
        }

        let x = &self.extraction;
        for (field, patterns) in [
            ("extraction.blacklist_regex", &x.blacklist_regex),
            ("extraction.token_drop_regex", &x.token_drop_regex),
        ] {
            for pattern in patterns {
                if let Err(e) = regex::Regex::new(pattern) {
                    return Err(invalid(field, &format!("{pattern}: {e}")));
                }
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, &format!("{value} is outside [0, 1]")))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be positive"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must not be negative"))
    }
}
