//! Record every degradation event: component, failure mode, fallback used, timestamp, recovery status.
//!
//! Timestamps come from the caller (the pipeline's event-time clock), never
//! from the wall clock.

use chrono::{DateTime, Utc};
use recall_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

/// Recovery status of a degradation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still in degraded mode.
    Active,
    /// Recovered to normal operation.
    Recovered,
}

/// A tracked degradation event with recovery status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks degradation events for reporting.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        self.events.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Mark every active degradation of `component` as recovered at `at`.
    /// Returns how many were closed.
    pub fn mark_recovered(&mut self, component: &str, at: DateTime<Utc>) -> usize {
        let mut closed = 0;
        for tracked in self.events.iter_mut() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(at);
                closed += 1;
            }
        }
        if closed > 0 {
            crate::tracing_setup::events::degradation_recovered(component);
        }
        closed
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    /// Get active (unrecovered) degradations.
    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }
}
