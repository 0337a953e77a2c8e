//! Data model shared across the pipeline.

mod degradation_event;
mod entity;
mod evidence;
mod log_line;
mod packed;
mod prediction;
mod relation;

pub use degradation_event::DegradationEvent;
pub use entity::{Entity, EntityCandidate, Mention};
pub use evidence::{EvidenceItem, EvidenceRef, PathTag, Provenance, QueryOrigin};
pub use log_line::{Extraction, LogLine};
pub use packed::{GraphEdge, GraphNode, GraphPack, PackedContext, TextPack, TextUnit};
pub use prediction::PredictionRecord;
pub use relation::{Relation, RelationCandidate};
