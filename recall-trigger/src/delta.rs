use recall_core::ids::EntityId;
use recall_graph::{DecayReport, UpsertReport};

/// What one graph version changed, as far as the trigger cares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDelta {
    pub version: u64,
    pub created: Vec<EntityId>,
    pub updated: Vec<EntityId>,
}

impl GraphDelta {
    pub fn from_upsert(report: &UpsertReport) -> Self {
        Self {
            version: report.version,
            created: report.created.clone(),
            updated: report.updated.clone(),
        }
    }

    /// A decay pass touches no entity; it only advances the version.
    pub fn from_decay(report: &DecayReport) -> Self {
        Self {
            version: report.version,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty()
    }
}
