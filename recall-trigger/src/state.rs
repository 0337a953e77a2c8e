//! Trigger phases and the state mutated only by the evaluator.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::ids::EntityId;

/// Where the evaluator is in its cycle.
///
/// `Idle → Accumulating → Fired → Cooldown → Idle/Accumulating`. `Fired` is
/// transient: it exists only inside a single evaluation, between deciding to
/// fire and handing the seeds off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing pending since the last fire.
    Idle,
    /// Entities pending; novelty is being accumulated.
    Accumulating,
    /// Decided to fire at `at`.
    Fired { at: DateTime<Utc> },
    /// No fire may happen before `until`. Novelty still accumulates.
    Cooldown { until: DateTime<Utc> },
}

/// Why a cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireReason {
    Novelty,
    Timeout,
    Severity,
    Burst,
}

impl FireReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Novelty => "novelty",
            Self::Timeout => "timeout",
            Self::Severity => "severity",
            Self::Burst => "burst",
        }
    }
}

impl fmt::Display for FireReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluator state. Reset to its post-fire baseline after every fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerState {
    pub phase: Phase,
    pub last_fired_at: Option<DateTime<Utc>>,
    pub last_fired_version: Option<u64>,
    /// Novelty accumulated since the last fire.
    pub novelty: f64,
    /// Entities touched since the last fire, with the time they were touched.
    pub pending: BTreeMap<EntityId, DateTime<Utc>>,
    /// When the current accumulation started (first pending entity).
    pub accumulating_since: Option<DateTime<Utc>>,
}

impl TriggerState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            last_fired_at: None,
            last_fired_version: None,
            novelty: 0.0,
            pending: BTreeMap::new(),
            accumulating_since: None,
        }
    }

    /// Clear accumulation after a fire.
    pub(crate) fn reset_after_fire(&mut self, at: DateTime<Utc>, version: u64) {
        self.last_fired_at = Some(at);
        self.last_fired_version = Some(version);
        self.novelty = 0.0;
        self.pending.clear();
        self.accumulating_since = None;
    }

    pub fn in_cooldown(&self, now: DateTime<Utc>) -> bool {
        matches!(self.phase, Phase::Cooldown { until } if now < until)
    }
}

impl Default for TriggerState {
    fn default() -> Self {
        Self::new()
    }
}
