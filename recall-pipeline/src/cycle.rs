//! One retrieval cycle's output.

use serde::{Deserialize, Serialize};

use recall_core::models::{PackedContext, PredictionRecord};
use recall_graph::GraphSnapshot;
use recall_retrieval::RetrievalOutcome;
use recall_trigger::FireEvent;

/// Everything produced for one fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOutput {
    pub fire: FireEvent,
    pub outcome: RetrievalOutcome,
    pub packed: PackedContext,
    /// Present when a generator is attached and succeeded.
    pub prediction: Option<PredictionRecord>,
}

impl CycleOutput {
    pub fn cycle_id(&self) -> &str {
        &self.packed.cycle_id
    }

    pub fn partial(&self) -> bool {
        self.packed.partial
    }
}

/// Query handed to the generator: the seed entities as `type=value`, in
/// seed rank order.
pub fn build_query(fire: &FireEvent, snapshot: &GraphSnapshot) -> String {
    let seeds: Vec<String> = fire
        .seeds
        .iter()
        .filter_map(|id| snapshot.entity(id))
        .map(|e| format!("{}={}", e.etype, e.value))
        .collect();
    format!("{} activity involving {}", fire.reason, seeds.join(", "))
}
