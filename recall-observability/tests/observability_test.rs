//! Tests for recall-observability: counters and degradation tracking.

use chrono::{Duration, TimeZone, Utc};
use recall_core::models::DegradationEvent;

use recall_observability::degradation::{DegradationTracker, RecoveryStatus};
use recall_observability::tracing_setup::init_tracing_with_filter;
use recall_observability::PipelineCounters;

fn event(component: &str, secs: i64) -> DegradationEvent {
    DegradationEvent {
        component: component.to_string(),
        failure: "provider unavailable".to_string(),
        fallback_used: "structural only".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs),
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[test]
fn counters_accumulate_and_snapshot() {
    let counters = PipelineCounters::new();
    counters.record_line();
    counters.record_line();
    counters.record_rejections(3, 1);
    counters.record_prune(2, 5);
    counters.record_partial_cycle();
    counters.record_suppressed(0);

    let snap = counters.snapshot();
    assert_eq!(snap.lines_ingested, 2);
    assert_eq!(snap.items_rejected, 3);
    assert_eq!(snap.integrity_violations, 1);
    assert_eq!(snap.entities_pruned, 2);
    assert_eq!(snap.edges_pruned, 5);
    assert_eq!(snap.partial_cycles, 1);
    assert_eq!(snap.suppressed_by_cooldown, 0);
    assert_eq!(snap.fires, 0);
}

#[test]
fn counters_are_shared_across_threads() {
    let counters = std::sync::Arc::new(PipelineCounters::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = std::sync::Arc::clone(&counters);
            std::thread::spawn(move || {
                for _ in 0..250 {
                    c.record_line();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(counters.snapshot().lines_ingested, 1000);
}

#[test]
fn counters_snapshot_serializes() {
    let counters = PipelineCounters::new();
    counters.record_fire();
    let json = serde_json::to_string(&counters.snapshot()).unwrap();
    assert!(json.contains("\"fires\":1"));
}

// ---------------------------------------------------------------------------
// Degradation tracker
// ---------------------------------------------------------------------------

#[test]
fn tracker_records_and_recovers() {
    init_tracing_with_filter("debug");
    let mut tracker = DegradationTracker::new();
    tracker.record(event("semantic_path", 0));
    tracker.record(event("semantic_path", 10));
    assert!(tracker.is_degraded("semantic_path"));
    assert_eq!(tracker.active_degradations().len(), 2);

    let closed = tracker.mark_recovered("semantic_path", event("x", 20).timestamp);
    assert_eq!(closed, 2);
    assert!(!tracker.is_degraded("semantic_path"));
    assert!(tracker
        .events()
        .iter()
        .all(|t| t.recovery_status == RecoveryStatus::Recovered && t.recovered_at.is_some()));
}

#[test]
fn tracker_recovery_is_per_component() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("semantic_path", 0));
    tracker.record(event("structural_path", 0));
    tracker.mark_recovered("structural_path", event("x", 5).timestamp);
    assert!(tracker.is_degraded("semantic_path"));
    assert!(!tracker.is_degraded("structural_path"));
    assert_eq!(tracker.mark_recovered("unknown", event("x", 5).timestamp), 0);
}
