use serde::{Deserialize, Serialize};

/// One line of the newline-delimited prediction output written downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub query: String,
    pub answer: String,
    pub evidence_refs: Vec<String>,
}

impl PredictionRecord {
    /// Serialize as a single NDJSON line (no trailing newline).
    pub fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
