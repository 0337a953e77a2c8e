/// Recall system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length (hex chars) of a derived entity identifier.
pub const ENTITY_ID_LEN: usize = 16;

/// Separator between type and value when hashing an entity key.
pub const ENTITY_KEY_SEPARATOR: char = '\u{1f}';

/// Hard ceiling on structural traversal depth regardless of config.
pub const MAX_TRAVERSAL_DEPTH: usize = 16;

/// Component name used in degradation events for the semantic path.
pub const COMPONENT_SEMANTIC_PATH: &str = "retrieval.semantic";

/// Component name used in degradation events for the structural path.
pub const COMPONENT_STRUCTURAL_PATH: &str = "retrieval.structural";

/// Component name used in degradation events for index insertion.
pub const COMPONENT_EMBEDDING_INDEX: &str = "embeddings.index";
