//! Packer: both packs for one retrieval cycle under the configured budget.

use recall_core::config::PackerConfig;
use recall_core::errors::RecallResult;
use recall_core::models::{EvidenceItem, PackedContext};
use recall_graph::GraphSnapshot;
use recall_observability::events;
use recall_tokens::Meter;

use crate::graph_pack::pack_graph;
use crate::text_pack::pack_text;

#[derive(Debug, Clone)]
pub struct Packer {
    config: PackerConfig,
    meter: Meter,
}

impl Packer {
    /// Fails only when the token meter cannot load its encoding.
    pub fn new(config: PackerConfig) -> RecallResult<Self> {
        let meter = Meter::for_unit(config.budget_unit)?;
        Ok(Self { config, meter })
    }

    pub fn with_meter(config: PackerConfig, meter: Meter) -> Self {
        Self { config, meter }
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    pub fn meter(&self) -> &Meter {
        &self.meter
    }

    pub fn pack(
        &self,
        cycle_id: &str,
        snapshot: &GraphSnapshot,
        evidence: &[EvidenceItem],
        partial: bool,
    ) -> PackedContext {
        let text_pack = pack_text(
            cycle_id,
            evidence,
            &self.meter,
            self.config.budget,
            self.config.dedup_case_insensitive,
        );
        if text_pack.truncated {
            let with_text = evidence.iter().filter(|e| e.text.is_some()).count();
            events::pack_truncated(
                cycle_id,
                text_pack.items.len(),
                with_text.saturating_sub(text_pack.items.len()),
                self.config.budget,
            );
        }
        PackedContext {
            cycle_id: cycle_id.to_string(),
            text_pack,
            graph_pack: pack_graph(snapshot, evidence),
            partial,
        }
    }
}
