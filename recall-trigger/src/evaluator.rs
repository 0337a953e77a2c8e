//! The trigger state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::clock::add_secs;
use recall_core::config::TriggerConfig;
use recall_core::ids::EntityId;
use recall_graph::formula::{decay_factor, elapsed_secs};
use recall_graph::GraphSnapshot;
use recall_observability::events;

use crate::delta::GraphDelta;
use crate::signals::UrgentSignal;
use crate::state::{FireReason, Phase, TriggerState};

/// Everything the evaluator sees for one graph version.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Snapshot published by the version being observed.
    pub snapshot: &'a GraphSnapshot,
    pub delta: &'a GraphDelta,
    /// Monotonic event time of the version.
    pub now: DateTime<Utc>,
    pub signal: Option<&'a UrgentSignal>,
}

/// A decision to run a retrieval cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireEvent {
    /// Snapshot version the cycle must run against.
    pub version: u64,
    pub at: DateTime<Utc>,
    pub reason: FireReason,
    /// Seed entities ranked by recency × weight, best first.
    pub seeds: Vec<EntityId>,
    /// Novelty score at the moment of firing.
    pub novelty: f64,
}

/// Debounced trigger. Owned by the graph writer so that each version bump
/// and its evaluation form one step.
#[derive(Debug, Clone)]
pub struct TriggerEvaluator {
    config: TriggerConfig,
    state: TriggerState,
    suppressed: u64,
}

impl TriggerEvaluator {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            state: TriggerState::new(),
            suppressed: 0,
        }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Versions on which a fire condition held but cooldown blocked it.
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed
    }

    /// Novelty accumulated so far plus the elapsed-time term.
    pub fn novelty_score(&self, now: DateTime<Utc>) -> f64 {
        let since = self.state.last_fired_at.or(self.state.accumulating_since);
        let minutes = since.map_or(0.0, |t| elapsed_secs(t, now) / 60.0);
        self.state.novelty + self.config.elapsed_gain_per_min * minutes
    }

    /// Fold one graph version into the state and decide whether to fire.
    pub fn observe(&mut self, obs: Observation<'_>) -> Option<FireEvent> {
        self.accumulate(&obs);

        let (next, reason) = self.transition(obs.now, obs.signal);
        if matches!(next, Phase::Cooldown { .. }) && !self.state.pending.is_empty() {
            if let Some(held) = self.fire_reason(obs.now, obs.signal) {
                self.suppressed += 1;
                events::fire_suppressed(held.as_str(), "cooldown");
            }
        }
        self.state.phase = next;

        let Phase::Fired { at } = next else {
            return None;
        };
        let reason = reason?;
        let novelty = self.novelty_score(at);
        let seeds = self.rank_seeds(obs.snapshot, at);
        if seeds.is_empty() {
            // Everything pending was pruned before the fire.
            self.state.pending.clear();
            self.state.accumulating_since = None;
            self.state.novelty = 0.0;
            self.state.phase = Phase::Idle;
            events::fire_suppressed(reason.as_str(), "no live seeds");
            return None;
        }

        let version = obs.snapshot.version();
        self.state.reset_after_fire(at, version);
        self.state.phase = Phase::Cooldown {
            until: add_secs(at, self.config.cooldown_secs),
        };

        events::trigger_fired(version, reason.as_str(), seeds.len(), novelty);
        Some(FireEvent {
            version,
            at,
            reason,
            seeds,
            novelty,
        })
    }

    /// The transition function: current phase and inputs to the next phase.
    fn transition(&self, now: DateTime<Utc>, signal: Option<&UrgentSignal>) -> (Phase, Option<FireReason>) {
        if self.state.in_cooldown(now) {
            return (self.state.phase, None);
        }
        if self.state.pending.is_empty() {
            return (Phase::Idle, None);
        }
        match self.fire_reason(now, signal) {
            Some(reason) => (Phase::Fired { at: now }, Some(reason)),
            None => (Phase::Accumulating, None),
        }
    }

    fn fire_reason(&self, now: DateTime<Utc>, signal: Option<&UrgentSignal>) -> Option<FireReason> {
        match signal {
            Some(UrgentSignal::Severity { .. }) => return Some(FireReason::Severity),
            Some(UrgentSignal::Burst { .. }) => return Some(FireReason::Burst),
            None => {}
        }
        if self.novelty_score(now) >= self.config.novelty_threshold {
            return Some(FireReason::Novelty);
        }
        let reference = self.state.last_fired_at.or(self.state.accumulating_since)?;
        (elapsed_secs(reference, now) >= self.config.max_wait_secs as f64).then_some(FireReason::Timeout)
    }

    fn accumulate(&mut self, obs: &Observation<'_>) {
        let threshold = self.config.high_weight_threshold;
        let gains = obs
            .delta
            .created
            .iter()
            .map(|id| (id, self.config.new_entity_gain))
            .chain(obs.delta.updated.iter().map(|id| (id, self.config.updated_entity_gain)));

        for (id, gain) in gains {
            let Some(entity) = obs.snapshot.entity(id) else {
                continue;
            };
            if entity.weight >= threshold {
                self.state.novelty += gain * entity.weight;
            }
            self.state.pending.insert(id.clone(), obs.now);
        }
        if !self.state.pending.is_empty() && self.state.accumulating_since.is_none() {
            self.state.accumulating_since = Some(obs.now);
        }
    }

    /// Pending entities still in the snapshot, ranked by
    /// `weight × 0.5^(age / recency_half_life)`, ties by id.
    fn rank_seeds(&self, snapshot: &GraphSnapshot, now: DateTime<Utc>) -> Vec<EntityId> {
        let half_life = self.config.recency_half_life_secs as f64;
        let mut scored: Vec<(f64, &EntityId)> = self
            .state
            .pending
            .keys()
            .filter_map(|id| {
                let entity = snapshot.entity(id)?;
                let recency = decay_factor(elapsed_secs(entity.last_seen, now), half_life);
                Some((entity.weight * recency, id))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(self.config.max_seeds)
            .map(|(_, id)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use recall_core::config::GraphConfig;
    use recall_core::models::EntityCandidate;
    use recall_graph::{GraphStore, UpsertBatch};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn step(
        store: &mut GraphStore,
        eval: &mut TriggerEvaluator,
        values: &[&str],
        secs: i64,
        signal: Option<UrgentSignal>,
    ) -> Option<FireEvent> {
        let entities = values.iter().map(|v| EntityCandidate::new("block_id", *v)).collect();
        let report = store.upsert(UpsertBatch::new(entities, vec![], t(secs))).unwrap();
        let delta = GraphDelta::from_upsert(&report);
        let snap = store.snapshot();
        eval.observe(Observation {
            snapshot: &snap,
            delta: &delta,
            now: t(secs),
            signal: signal.as_ref(),
        })
    }

    #[test]
    fn starts_idle_and_accumulates() {
        let mut store = GraphStore::new(GraphConfig::default());
        let mut eval = TriggerEvaluator::new(TriggerConfig::default());
        assert_eq!(eval.phase(), Phase::Idle);
        assert!(step(&mut store, &mut eval, &["blk_1"], 0, None).is_none());
        assert_eq!(eval.phase(), Phase::Accumulating);
        assert!(eval.state().novelty > 0.0);
    }

    #[test]
    fn novelty_threshold_fires_then_cools_down() {
        let mut store = GraphStore::new(GraphConfig::default());
        let mut eval = TriggerEvaluator::new(TriggerConfig::default());
        assert!(step(&mut store, &mut eval, &["blk_1", "blk_2"], 0, None).is_none());
        let fire = step(&mut store, &mut eval, &["blk_3"], 1, None).unwrap();
        assert_eq!(fire.reason, FireReason::Novelty);
        assert_eq!(fire.seeds.len(), 3);
        assert!(matches!(eval.phase(), Phase::Cooldown { .. }));
        assert_eq!(eval.state().novelty, 0.0);
        assert!(eval.state().pending.is_empty());
    }

    #[test]
    fn cooldown_suppresses_fire_but_keeps_accumulating() {
        let mut store = GraphStore::new(GraphConfig::default());
        let mut eval = TriggerEvaluator::new(TriggerConfig::default());
        step(&mut store, &mut eval, &["a1", "a2", "a3"], 0, None).unwrap();
        assert!(step(&mut store, &mut eval, &["b1", "b2", "b3", "b4"], 5, None).is_none());
        assert!(eval.state().novelty >= 3.0);
        assert_eq!(eval.suppressed_count(), 1);
        // Cooldown (30s) is over: the accumulated novelty fires on the next version.
        let fire = step(&mut store, &mut eval, &[], 31, None).unwrap();
        assert_eq!(fire.reason, FireReason::Novelty);
    }

    #[test]
    fn urgent_signal_fires_immediately() {
        let mut store = GraphStore::new(GraphConfig::default());
        let mut eval = TriggerEvaluator::new(TriggerConfig::default());
        let fire = step(&mut store, &mut eval, &["blk_9"], 0, Some(UrgentSignal::Severity { level: 3 })).unwrap();
        assert_eq!(fire.reason, FireReason::Severity);
    }

    #[test]
    fn timeout_fires_only_with_pending_entities() {
        let config = TriggerConfig {
            novelty_threshold: 1_000.0,
            elapsed_gain_per_min: 0.0,
            max_wait_secs: 60,
            ..TriggerConfig::default()
        };
        let mut store = GraphStore::new(GraphConfig::default());
        let mut eval = TriggerEvaluator::new(config);
        // Nothing pending: no timeout fire however long we wait.
        assert!(step(&mut store, &mut eval, &[], 1_000, None).is_none());
        assert_eq!(eval.phase(), Phase::Idle);

        assert!(step(&mut store, &mut eval, &["blk_1"], 1_010, None).is_none());
        assert!(step(&mut store, &mut eval, &[], 1_069, None).is_none());
        let fire = step(&mut store, &mut eval, &[], 1_070, None).unwrap();
        assert_eq!(fire.reason, FireReason::Timeout);
    }

    #[test]
    fn seeds_ranked_by_recency_weight_and_capped() {
        let config = TriggerConfig {
            max_seeds: 2,
            novelty_threshold: 1_000.0,
            ..TriggerConfig::default()
        };
        let mut store = GraphStore::new(GraphConfig::default());
        let mut eval = TriggerEvaluator::new(config);
        step(&mut store, &mut eval, &["old"], 0, None);
        step(&mut store, &mut eval, &["mid"], 100, None);
        let fire = step(&mut store, &mut eval, &["new"], 200, Some(UrgentSignal::Severity { level: 2 })).unwrap();
        let expect = |v: &str| EntityCandidate::new("block_id", v).id().unwrap();
        assert_eq!(fire.seeds, vec![expect("new"), expect("mid")]);
    }

    #[test]
    fn fire_without_live_seeds_discards_accumulated_novelty() {
        let mut store = GraphStore::new(GraphConfig::default());
        let mut eval = TriggerEvaluator::new(TriggerConfig::default());
        assert!(step(&mut store, &mut eval, &["blk_1", "blk_2"], 0, None).is_none());
        assert_eq!(eval.state().novelty, 2.0);

        // Everything pending decays away before the elapsed term forces a fire.
        let decay = store.decay(t(10_000)).unwrap();
        assert_eq!(decay.entities_pruned.len(), 2);
        let delta = GraphDelta::from_decay(&decay);
        let snap = store.snapshot();
        let fire = eval.observe(Observation {
            snapshot: &snap,
            delta: &delta,
            now: t(10_000),
            signal: None,
        });
        assert!(fire.is_none());
        assert_eq!(eval.phase(), Phase::Idle);
        assert_eq!(eval.state().novelty, 0.0);
        assert!(eval.state().pending.is_empty());

        // A single new entity starts from scratch.
        assert!(step(&mut store, &mut eval, &["blk_3"], 10_001, None).is_none());
        assert_eq!(eval.state().novelty, 1.0);
    }
}
