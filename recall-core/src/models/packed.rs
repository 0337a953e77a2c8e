//! Portable context formats handed to the generation step.

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;
use crate::models::PathTag;

/// One text unit of a TextPack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    pub text: String,
    pub provenance_tag: String,
    pub source_path: PathTag,
}

/// Ordered, budget-bounded sequence of text evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPack {
    pub items: Vec<TextUnit>,
    /// Cumulative size of `items` in budget units.
    pub size: usize,
    pub budget: usize,
    pub truncated: bool,
}

impl TextPack {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render as the text block consumed by the generation prompt.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, unit) in self.items.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!(
                "[{}] ({}) {}",
                unit.provenance_tag, unit.source_path, unit.text
            ));
        }
        out
    }
}

/// A node of the retrieved subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub etype: String,
    pub value: String,
    pub weight: f64,
}

/// An edge of the retrieved subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub src: EntityId,
    pub dst: EntityId,
    pub kind: String,
    pub weight: f64,
}

/// Compact subgraph of retrieved evidence. Nodes sorted by id, edges by
/// `(src, dst, kind)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPack {
    /// Snapshot version the pack was cut from.
    pub version: u64,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphPack {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn contains_node(&self, id: &EntityId) -> bool {
        self.nodes.binary_search_by(|n| n.id.cmp(id)).is_ok()
    }
}

/// Both packs for one retrieval cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedContext {
    pub cycle_id: String,
    pub text_pack: TextPack,
    pub graph_pack: GraphPack,
    /// One retrieval path failed or timed out; evidence is degraded.
    pub partial: bool,
}
