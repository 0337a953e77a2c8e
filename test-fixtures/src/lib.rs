//! Shared test helpers: fixed clocks, synthetic log streams, scripted
//! extractors, mock embedding providers, and the JSON fixture loader.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use recall_core::errors::{EmbeddingError, ExtractionError, RecallResult};
use recall_core::ids::LogId;
use recall_core::models::{EntityCandidate, Extraction, LogLine, RelationCandidate};
use recall_core::traits::{IEmbeddingProvider, IEntityExtractor};

// ---------------------------------------------------------------------------
// Time and candidates
// ---------------------------------------------------------------------------

/// Fixed origin for test timelines: 2024-01-01T00:00:00Z.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `t0() + secs`.
pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn entity(etype: &str, value: &str) -> EntityCandidate {
    EntityCandidate::new(etype, value)
}

/// Co-occurrence relation between two candidates.
///
/// # Panics
/// Panics if either candidate has no valid id.
pub fn co_occurs(a: &EntityCandidate, b: &EntityCandidate) -> RelationCandidate {
    RelationCandidate::between(a, b, "co_occurs")
        .unwrap_or_else(|| panic!("invalid candidates {a:?} / {b:?}"))
}

// ---------------------------------------------------------------------------
// Synthetic stream
// ---------------------------------------------------------------------------

const TEMPLATES: &[&str] = &[
    "INFO dfs.DataNode$DataXceiver: Receiving block blk_{n} src: /10.250.{a}.{b}:54106 dest: /10.250.{a}.{b}:50010",
    "INFO dfs.DataNode$PacketResponder: PacketResponder {d} for block blk_{n} terminating",
    "INFO dfs.FSNamesystem: BLOCK* NameSystem.addStoredBlock: blockMap updated: 10.251.{a}.{b}:50010 is added to blk_{n} size 67108864",
    "INFO dfs.DataNode$DataXceiver: Served block blk_{n} to /10.251.{a}.{b}",
    "INFO dfs.DataBlockScanner: Verification succeeded for blk_{n}",
];

/// Deterministic stream of HDFS-style background lines, one per second.
#[derive(Debug, Clone)]
pub struct SyntheticStream {
    state: u64,
    next_id: u64,
    step_secs: i64,
}

impl SyntheticStream {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407),
            next_id: 0,
            step_secs: 1,
        }
    }

    pub fn with_step_secs(mut self, step_secs: i64) -> Self {
        self.step_secs = step_secs;
        self
    }

    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state.max(1);
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }
}

impl Iterator for SyntheticStream {
    type Item = LogLine;

    fn next(&mut self) -> Option<LogLine> {
        let r = self.next_u64();
        let template = TEMPLATES[(r % TEMPLATES.len() as u64) as usize];
        let text = template
            .replace("{n}", &((r >> 8) % 50).to_string())
            .replace("{a}", &((r >> 16) % 4).to_string())
            .replace("{b}", &((r >> 24) % 8 + 1).to_string())
            .replace("{d}", &((r >> 32) % 3).to_string());
        let id = self.next_id;
        self.next_id += 1;
        Some(LogLine::new(id, at(id as i64 * self.step_secs), text))
    }
}

// ---------------------------------------------------------------------------
// Scripted extractor
// ---------------------------------------------------------------------------

/// Extractor with scripted output, keyed by line id or by substring.
/// Entities of a match are linked pairwise with `co_occurs`.
#[derive(Debug, Default)]
pub struct StaticExtractor {
    by_line: HashMap<LogId, Vec<EntityCandidate>>,
    by_substring: Vec<(String, Vec<EntityCandidate>)>,
    failing: HashSet<LogId>,
    calls: AtomicUsize,
}

impl StaticExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_line(mut self, id: u64, entities: Vec<EntityCandidate>) -> Self {
        self.by_line.insert(LogId(id), entities);
        self
    }

    pub fn when_contains(mut self, needle: &str, entities: Vec<EntityCandidate>) -> Self {
        self.by_substring.push((needle.to_string(), entities));
        self
    }

    pub fn fail_on(mut self, id: u64) -> Self {
        self.failing.insert(LogId(id));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IEntityExtractor for StaticExtractor {
    fn extract(&self, line: &LogLine) -> Result<Extraction, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&line.id) {
            return Err(ExtractionError::LineFailed {
                line: line.id,
                reason: "scripted failure".to_string(),
            });
        }
        let mut entities: Vec<EntityCandidate> = self.by_line.get(&line.id).cloned().unwrap_or_default();
        for (needle, ents) in &self.by_substring {
            if line.text.contains(needle.as_str()) {
                entities.extend(ents.iter().cloned());
            }
        }
        let mut relations = Vec::new();
        for (i, a) in entities.iter().enumerate() {
            for b in &entities[i + 1..] {
                if let Some(rel) = RelationCandidate::between(a, b, "co_occurs") {
                    if rel.src != rel.dst {
                        relations.push(rel);
                    }
                }
            }
        }
        Ok(Extraction { entities, relations })
    }

    fn name(&self) -> &str {
        "static"
    }
}

// ---------------------------------------------------------------------------
// Embedding providers
// ---------------------------------------------------------------------------

/// Deterministic bag-of-words embedder: each lowercase word adds 1.0 to a
/// blake3-chosen bucket.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dims: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }
}

impl IEmbeddingProvider for MockEmbeddingProvider {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        let mut v = vec![0.0f32; self.dims];
        for word in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.is_empty() {
                continue;
            }
            let hash = blake3::hash(word.to_lowercase().as_bytes());
            let bytes = hash.as_bytes();
            let bucket = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize % self.dims;
            v[bucket] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Provider that is always down.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    dims: usize,
}

impl FailingProvider {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl IEmbeddingProvider for FailingProvider {
    fn embed(&self, _text: &str) -> RecallResult<Vec<f32>> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: "failing".to_string(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Sleeps before delegating, to exercise timeouts.
pub struct SlowProvider {
    inner: Arc<dyn IEmbeddingProvider>,
    delay: StdDuration,
}

impl SlowProvider {
    pub fn new(inner: Arc<dyn IEmbeddingProvider>, delay: StdDuration) -> Self {
        Self { inner, delay }
    }
}

impl IEmbeddingProvider for SlowProvider {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        std::thread::sleep(self.delay);
        self.inner.embed(text)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "slow"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Delegates while enabled; fails like a dead endpoint once disabled.
pub struct SwitchableProvider {
    inner: Arc<dyn IEmbeddingProvider>,
    enabled: Arc<AtomicBool>,
}

impl SwitchableProvider {
    pub fn new(inner: Arc<dyn IEmbeddingProvider>) -> Self {
        Self {
            inner,
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared switch; flip it from the test body.
    pub fn switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }
}

impl IEmbeddingProvider for SwitchableProvider {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        if !self.enabled.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: "switchable".to_string(),
            }
            .into());
        }
        self.inner.embed(text)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "switchable"
    }

    fn is_available(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// JSON fixtures
// ---------------------------------------------------------------------------

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").join("data").exists() {
        if !path.pop() {
            panic!("Could not find test-fixtures directory from CARGO_MANIFEST_DIR={manifest_dir}");
        }
    }
    path.join("test-fixtures").join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

#[derive(Debug, Deserialize)]
struct StreamFixture {
    lines: Vec<FixtureLine>,
}

#[derive(Debug, Deserialize)]
struct FixtureLine {
    offset_secs: i64,
    text: String,
}

/// Load a recorded stream (`streams/<name>.json`) as log lines starting at
/// `t0()`, numbered from 0.
pub fn load_stream(name: &str) -> Vec<LogLine> {
    let fixture: StreamFixture = load_fixture(&format!("streams/{name}.json"));
    fixture
        .lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| LogLine::new(i as u64, at(l.offset_secs), l.text))
        .collect()
}
