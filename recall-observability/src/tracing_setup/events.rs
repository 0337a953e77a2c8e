//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log an applied upsert batch.
pub fn batch_upserted(version: u64, created: usize, updated: usize, rejected: usize) {
    tracing::debug!(
        event = "batch_upserted",
        version = version,
        created = created,
        updated = updated,
        rejected = rejected,
        "upsert applied"
    );
}

/// Log a rejected batch item.
pub fn item_rejected(kind: &str, index: usize, reason: &str) {
    tracing::debug!(
        event = "item_rejected",
        kind = %kind,
        index = index,
        reason = %reason,
        "batch item rejected"
    );
}

/// Log a relation dropped for a missing endpoint.
pub fn integrity_violation(src: &str, dst: &str, missing: &str) {
    tracing::warn!(
        event = "integrity_violation",
        src = %src,
        dst = %dst,
        missing = %missing,
        "dropping relation with missing endpoint"
    );
}

/// Log a completed decay pass.
pub fn graph_decayed(version: u64, entities_pruned: usize, edges_pruned: usize) {
    tracing::debug!(
        event = "graph_decayed",
        version = version,
        entities_pruned = entities_pruned,
        edges_pruned = edges_pruned,
        "decay pass complete"
    );
}

/// Log a trigger fire.
pub fn trigger_fired(version: u64, reason: &str, seeds: usize, novelty: f64) {
    tracing::info!(
        event = "trigger_fired",
        version = version,
        reason = %reason,
        seeds = seeds,
        novelty = novelty,
        "retrieval triggered"
    );
}

/// Log a fire condition that was held back (cooldown or no live seeds).
pub fn fire_suppressed(reason: &str, cause: &str) {
    tracing::debug!(
        event = "fire_suppressed",
        reason = %reason,
        cause = %cause,
        "fire suppressed"
    );
}

/// Log a retrieval path that failed or timed out.
pub fn path_degraded(path: &str, failure: &str) {
    tracing::warn!(
        event = "path_degraded",
        path = %path,
        failure = %failure,
        "retrieval path degraded"
    );
}

/// Log a TextPack that hit its budget.
pub fn pack_truncated(cycle_id: &str, kept: usize, dropped: usize, budget: usize) {
    tracing::info!(
        event = "pack_truncated",
        cycle_id = %cycle_id,
        kept = kept,
        dropped = dropped,
        budget = budget,
        "text pack truncated"
    );
}

/// Log the end of a retrieval cycle.
pub fn cycle_completed(cycle_id: &str, evidence: usize, partial: bool, nodes: usize, edges: usize) {
    tracing::info!(
        event = "cycle_completed",
        cycle_id = %cycle_id,
        evidence = evidence,
        partial = partial,
        nodes = nodes,
        edges = edges,
        "retrieval cycle completed"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a component leaving degraded mode.
pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        "degradation recovered"
    );
}
