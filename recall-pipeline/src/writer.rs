//! The writer step: everything that must happen atomically with a version
//! bump.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use recall_core::clock::MonotonicClock;
use recall_core::config::{GraphConfig, TriggerConfig};
use recall_core::errors::RecallResult;
use recall_core::models::{Extraction, LogLine};
use recall_graph::{GraphSnapshot, GraphStore, SnapshotReader, UpsertBatch};
use recall_observability::PipelineCounters;
use recall_trigger::{FireEvent, GraphDelta, Observation, SignalDetector, TriggerEvaluator};

/// A fire together with the snapshot it was decided on.
pub(crate) struct Fired {
    pub fire: FireEvent,
    pub snapshot: Arc<GraphSnapshot>,
}

/// Store, trigger, signal detector, and clock. Lives behind one mutex.
pub(crate) struct Writer {
    store: GraphStore,
    evaluator: TriggerEvaluator,
    signals: SignalDetector,
    clock: MonotonicClock,
    decay_every_lines: usize,
    lines_since_decay: usize,
}

impl Writer {
    pub fn new(graph: GraphConfig, trigger: TriggerConfig) -> Self {
        let decay_every_lines = graph.decay_every_lines;
        Self {
            store: GraphStore::new(graph),
            evaluator: TriggerEvaluator::new(trigger.clone()),
            signals: SignalDetector::new(trigger),
            clock: MonotonicClock::new(),
            decay_every_lines,
            lines_since_decay: 0,
        }
    }

    pub fn reader(&self) -> SnapshotReader {
        self.store.reader()
    }

    pub fn evaluator(&self) -> &TriggerEvaluator {
        &self.evaluator
    }

    pub fn now(&self) -> Option<DateTime<Utc>> {
        self.clock.now()
    }

    /// Upsert one line's candidates and evaluate the trigger on the new
    /// version; run a decay pass (also evaluated) when one is due.
    pub fn step(
        &mut self,
        line: &LogLine,
        extraction: Extraction,
        counters: &PipelineCounters,
    ) -> RecallResult<Option<Fired>> {
        let now = self.clock.observe(line.ts);
        let signal = self.signals.check(now, &line.text);
        let suppressed_before = self.evaluator.suppressed_count();

        let report = self.store.upsert(UpsertBatch::from_line(line, extraction, now))?;
        counters.record_rejections(report.rejected.len(), report.integrity_violations.len());
        let mut fired = self.observe(&GraphDelta::from_upsert(&report), now, signal.as_ref());

        self.lines_since_decay += 1;
        if self.decay_every_lines > 0 && self.lines_since_decay >= self.decay_every_lines {
            self.lines_since_decay = 0;
            let decay = self.store.decay(now)?;
            counters.record_prune(decay.entities_pruned.len(), decay.edges_pruned);
            let after_decay = self.observe(&GraphDelta::from_decay(&decay), now, None);
            if fired.is_none() {
                fired = after_decay;
            }
        }

        counters.record_suppressed(self.evaluator.suppressed_count() - suppressed_before);
        Ok(fired)
    }

    fn observe(
        &mut self,
        delta: &GraphDelta,
        now: DateTime<Utc>,
        signal: Option<&recall_trigger::UrgentSignal>,
    ) -> Option<Fired> {
        let snapshot = self.store.snapshot();
        self.evaluator
            .observe(Observation {
                snapshot: &snapshot,
                delta,
                now,
                signal,
            })
            .map(|fire| Fired { fire, snapshot })
    }
}
