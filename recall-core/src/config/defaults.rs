// Single source of truth for all default values.

// --- Graph ---
pub const DEFAULT_HALF_LIFE_SECS: u64 = 600;
pub const DEFAULT_PRUNE_FLOOR: f64 = 0.05;
pub const DEFAULT_ACTIVITY_GRACE_SECS: u64 = 120;
pub const DEFAULT_MAX_MENTIONS_PER_ENTITY: usize = 8;
pub const DEFAULT_REINFORCEMENT: f64 = 0.35;
pub const DEFAULT_DECAY_EVERY_LINES: usize = 32;

// --- Trigger ---
pub const DEFAULT_NOVELTY_THRESHOLD: f64 = 3.0;
pub const DEFAULT_HIGH_WEIGHT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_NEW_ENTITY_GAIN: f64 = 1.0;
pub const DEFAULT_UPDATED_ENTITY_GAIN: f64 = 0.25;
pub const DEFAULT_ELAPSED_GAIN_PER_MIN: f64 = 0.05;
pub const DEFAULT_MAX_WAIT_SECS: u64 = 900;
pub const DEFAULT_COOLDOWN_SECS: u64 = 30;
pub const DEFAULT_RECENCY_HALF_LIFE_SECS: u64 = 300;
pub const DEFAULT_MAX_SEEDS: usize = 8;
pub const DEFAULT_ENABLE_SEVERITY_TRIGGER: bool = true;
pub const DEFAULT_ENABLE_BURST_TRIGGER: bool = true;
pub const DEFAULT_BURST_WINDOW_SECS: u64 = 300;
pub const DEFAULT_BURST_EMA_ALPHA: f64 = 0.01;
pub const DEFAULT_BURST_SIGMA: f64 = 3.0;
pub const DEFAULT_TRIGGER_KEYWORDS: &[&str] = &[
    "fatal",
    "panic",
    "exception",
    "critical",
    "failure",
    "machine check",
];
pub const DEFAULT_SEVERITY_KEYWORDS_FATAL: &[&str] = &["fatal", "panic", "critical", "machine check"];
pub const DEFAULT_SEVERITY_KEYWORDS_ERROR: &[&str] = &[
    "error",
    "exception",
    "fail",
    "failure",
    "crash",
    "abort",
    "terminated",
];

// --- Retrieval ---
pub const DEFAULT_ALPHA: f64 = 0.6;
pub const DEFAULT_SEMANTIC_TOP_K: usize = 20;
pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_MAX_NODES: usize = 64;
pub const DEFAULT_DEPTH_DECAY: f64 = 0.7;
pub const DEFAULT_MIN_EDGE_WEIGHT: f64 = 0.05;
pub const DEFAULT_MAX_DEGREE: usize = 200;
pub const DEFAULT_MAX_EVIDENCE: usize = 30;
pub const DEFAULT_PATH_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_TEMPORAL_K: usize = 15;
pub const DEFAULT_TEMPORAL_HALF_LIFE_SECS: u64 = 600;
pub const DEFAULT_SEVERITY_WEIGHT: f64 = 1.0;
pub const DEFAULT_PROXIMITY_WEIGHT: f64 = 1.0;
pub const DEFAULT_RECENCY_WEIGHT: f64 = 1.0;

// --- Packer ---
pub const DEFAULT_PACK_BUDGET: usize = 2_000;
pub const DEFAULT_DEDUP_CASE_INSENSITIVE: bool = false;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashed-tfidf";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 256;
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_INDEX_CAPACITY: usize = 50_000;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_API_KEY_ENV: &str = "RECALL_EMBEDDING_API_KEY";

// --- Extraction ---
pub const DEFAULT_THETA_TC: usize = 2;
pub const DEFAULT_THETA_RF: usize = 2;
pub const DEFAULT_RECURRENCE_WINDOW_SECS: u64 = 300;
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;
pub const DEFAULT_MAX_ENTITIES_PER_LINE: usize = 16;
pub const DEFAULT_COOCCURRENCE_KIND: &str = "co_occurs";
pub const DEFAULT_BLACKLIST_EXACT: &[&str] = &["127.0.0.1", "0.0.0.0", "localhost", "/tmp"];
pub const DEFAULT_BLACKLIST_REGEX: &[&str] = &[r"^::1$"];
pub const DEFAULT_TOKEN_DROP_REGEX: &[&str] = &[r"^\d{4}-\d{2}-\d{2}-\d{2}\.\d{2}\.\d{2}\.\d+$"];

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = true;

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
