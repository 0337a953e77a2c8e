//! Stable identifiers for entities, log lines, and edges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ENTITY_ID_LEN, ENTITY_KEY_SEPARATOR};
use crate::errors::GraphError;
use crate::text::collapse_whitespace;

/// Stable entity identifier derived from the normalized `(type, value)` pair.
///
/// Always [`ENTITY_ID_LEN`] lowercase hex characters, so the lexical order of
/// ids is a total order usable for deterministic tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Derive the id for a `(type, value)` pair. Returns `None` when either
    /// side is empty after normalization.
    pub fn derive(etype: &str, value: &str) -> Option<Self> {
        let etype = normalize_type(etype);
        let value = normalize_value(value);
        if etype.is_empty() || value.is_empty() {
            return None;
        }
        let key = format!("{etype}{ENTITY_KEY_SEPARATOR}{value}");
        let hex = blake3::hash(key.as_bytes()).to_hex();
        Some(Self(hex.as_str()[..ENTITY_ID_LEN].to_string()))
    }

    /// Parse an identifier coming from an external producer.
    pub fn parse(raw: &str) -> Result<Self, GraphError> {
        let well_formed = raw.len() == ENTITY_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(GraphError::MalformedIdentifier { id: raw.to_string() })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Normalize an entity type tag: trimmed, lowercased.
pub fn normalize_type(etype: &str) -> String {
    etype.trim().to_lowercase()
}

/// Normalize an entity value: trimmed, inner whitespace collapsed. Case is kept.
pub fn normalize_value(value: &str) -> String {
    collapse_whitespace(value.trim())
}

/// Identifier of a log line (and of the text snippet indexed for it).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LogId(pub u64);

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log#{}", self.0)
    }
}

/// Identity of a directed, typed edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub src: EntityId,
    pub dst: EntityId,
    pub kind: String,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-[{}]->{}", self.src, self.kind, self.dst)
    }
}
