//! Lock-free pipeline counters.
//!
//! Every failure the pipeline absorbs instead of propagating lands in one of
//! these, so a degraded run is visible without reading logs.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Monotonic counters shared by the ingest loop and retrieval cycles.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    lines_ingested: AtomicU64,
    extraction_failures: AtomicU64,
    items_rejected: AtomicU64,
    integrity_violations: AtomicU64,
    entities_pruned: AtomicU64,
    edges_pruned: AtomicU64,
    fires: AtomicU64,
    suppressed_by_cooldown: AtomicU64,
    provider_timeouts: AtomicU64,
    provider_failures: AtomicU64,
    partial_cycles: AtomicU64,
    truncations: AtomicU64,
    index_insert_failures: AtomicU64,
}

/// Point-in-time copy of [`PipelineCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersSnapshot {
    pub lines_ingested: u64,
    pub extraction_failures: u64,
    pub items_rejected: u64,
    pub integrity_violations: u64,
    pub entities_pruned: u64,
    pub edges_pruned: u64,
    pub fires: u64,
    pub suppressed_by_cooldown: u64,
    pub provider_timeouts: u64,
    pub provider_failures: u64,
    pub partial_cycles: u64,
    pub truncations: u64,
    pub index_insert_failures: u64,
}

fn bump(counter: &AtomicU64, n: u64) {
    if n > 0 {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

impl PipelineCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_line(&self) {
        bump(&self.lines_ingested, 1);
    }

    pub fn record_extraction_failure(&self) {
        bump(&self.extraction_failures, 1);
    }

    pub fn record_rejections(&self, rejected: usize, integrity_violations: usize) {
        bump(&self.items_rejected, rejected as u64);
        bump(&self.integrity_violations, integrity_violations as u64);
    }

    pub fn record_prune(&self, entities: usize, edges: usize) {
        bump(&self.entities_pruned, entities as u64);
        bump(&self.edges_pruned, edges as u64);
    }

    pub fn record_fire(&self) {
        bump(&self.fires, 1);
    }

    pub fn record_suppressed(&self, n: u64) {
        bump(&self.suppressed_by_cooldown, n);
    }

    pub fn record_provider_timeout(&self) {
        bump(&self.provider_timeouts, 1);
    }

    pub fn record_provider_failure(&self) {
        bump(&self.provider_failures, 1);
    }

    pub fn record_partial_cycle(&self) {
        bump(&self.partial_cycles, 1);
    }

    pub fn record_truncation(&self) {
        bump(&self.truncations, 1);
    }

    pub fn record_index_insert_failure(&self) {
        bump(&self.index_insert_failures, 1);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        CountersSnapshot {
            lines_ingested: load(&self.lines_ingested),
            extraction_failures: load(&self.extraction_failures),
            items_rejected: load(&self.items_rejected),
            integrity_violations: load(&self.integrity_violations),
            entities_pruned: load(&self.entities_pruned),
            edges_pruned: load(&self.edges_pruned),
            fires: load(&self.fires),
            suppressed_by_cooldown: load(&self.suppressed_by_cooldown),
            provider_timeouts: load(&self.provider_timeouts),
            provider_failures: load(&self.provider_failures),
            partial_cycles: load(&self.partial_cycles),
            truncations: load(&self.truncations),
            index_insert_failures: load(&self.index_insert_failures),
        }
    }
}
