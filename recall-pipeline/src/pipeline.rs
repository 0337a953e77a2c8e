//! RecallPipeline: ingest loop and retrieval cycles.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::runtime::{Handle, Runtime};

use recall_core::config::{RecallConfig, TriggerConfig};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::ids::EntityId;
use recall_core::models::{DegradationEvent, Extraction, LogLine, PredictionRecord};
use recall_core::traits::{IEmbeddingProvider, IEntityExtractor, IGenerator};
use recall_embeddings::{create_provider, IndexedSnippet, SharedIndex, VectorIndex};
use recall_extraction::{EntityFilter, StatisticalExtractor};
use recall_graph::{GraphSnapshot, SnapshotReader};
use recall_observability::{events, CountersSnapshot, DegradationTracker, PipelineCounters};
use recall_packer::Packer;
use recall_retrieval::engine::{SEMANTIC_PATH, STRUCTURAL_PATH};
use recall_retrieval::{Anchor, DualPathRetriever, PathStatus, RetrievalOutcome};
use recall_trigger::{severity_level, FireEvent, Phase};

use crate::cycle::{build_query, CycleOutput};
use crate::writer::{Fired, Writer};

/// The online evidence pipeline for one log stream.
///
/// [`ingest`](Self::ingest) is synchronous: it embeds on the calling thread
/// and drives retrieval on the pipeline's own tokio runtime. Callers already
/// inside a runtime must use [`ingest_async`](Self::ingest_async), which
/// moves embedding onto the blocking pool. Lines are expected one at a time,
/// in log order.
pub struct RecallPipeline {
    extractor: Arc<dyn IEntityExtractor>,
    filter: EntityFilter,
    provider: Arc<dyn IEmbeddingProvider>,
    index: SharedIndex,
    writer: Mutex<Writer>,
    reader: SnapshotReader,
    retriever: DualPathRetriever,
    packer: Packer,
    generator: Option<Arc<dyn IGenerator>>,
    counters: PipelineCounters,
    degradation: Mutex<DegradationTracker>,
    trigger: TriggerConfig,
    /// Taken on drop so it can be shut down without blocking.
    runtime: Option<Runtime>,
}

/// A line that survived extraction, waiting for its embedding.
struct Prepared {
    extraction: Extraction,
    mentioned: Vec<EntityId>,
    severity: u8,
}

impl RecallPipeline {
    /// Pipeline with explicit extraction and embedding backends.
    pub fn new(
        config: RecallConfig,
        extractor: Arc<dyn IEntityExtractor>,
        provider: Arc<dyn IEmbeddingProvider>,
    ) -> RecallResult<Self> {
        config.validate()?;
        let filter = EntityFilter::from_config(&config.extraction)?;
        let index = VectorIndex::shared(provider.dimensions(), config.embedding.index_capacity);
        let writer = Writer::new(config.graph.clone(), config.trigger.clone());
        let reader = writer.reader();
        let retriever = DualPathRetriever::from_config(&config.retrieval, Arc::clone(&provider), Arc::clone(&index));
        let packer = Packer::new(config.packer.clone())?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("recall-retrieval")
            .enable_all()
            .build()
            .map_err(|e| RecallError::Concurrency(format!("failed to start retrieval runtime: {e}")))?;

        tracing::info!(
            extractor = extractor.name(),
            provider = provider.name(),
            dimensions = provider.dimensions(),
            "pipeline ready"
        );
        Ok(Self {
            extractor,
            filter,
            provider,
            index,
            writer: Mutex::new(writer),
            reader,
            retriever,
            packer,
            generator: None,
            counters: PipelineCounters::new(),
            degradation: Mutex::new(DegradationTracker::new()),
            trigger: config.trigger,
            runtime: Some(runtime),
        })
    }

    /// Pipeline with the statistical extractor and the configured embedding
    /// provider.
    pub fn from_config(config: RecallConfig) -> RecallResult<Self> {
        let extractor = Arc::new(StatisticalExtractor::new(config.extraction.clone())?);
        let provider = create_provider(&config.embedding)?;
        Self::new(config, extractor, provider)
    }

    pub fn with_generator(mut self, generator: Arc<dyn IGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Ingest one line. Returns the cycle output when the line caused a fire.
    ///
    /// Extraction, embedding, and retrieval failures are counted and absorbed.
    /// A poisoned lock is returned as an error, and so is a call made from
    /// inside an async runtime.
    pub fn ingest(&self, line: LogLine) -> RecallResult<Option<CycleOutput>> {
        if Handle::try_current().is_ok() {
            return Err(RecallError::Concurrency(
                "ingest called inside an async runtime; use ingest_async".to_string(),
            ));
        }
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| RecallError::Concurrency("retrieval runtime already shut down".to_string()))?;

        let span = recall_observability::ingest_span!(line.id);
        let Some(prepared) = span.in_scope(|| self.prepare(&line)) else {
            return Ok(None);
        };
        let vector = span.in_scope(|| self.provider.embed(&line.text));
        let Some(Fired { fire, snapshot }) = span.in_scope(|| self.commit(&line, prepared, vector))? else {
            return Ok(None);
        };
        self.counters.record_fire();
        Ok(Some(runtime.block_on(self.run_cycle(fire, snapshot, anchor(&line)))?))
    }

    /// Ingest every line, collecting the cycles they produced.
    pub fn ingest_all(&self, lines: impl IntoIterator<Item = LogLine>) -> RecallResult<Vec<CycleOutput>> {
        let mut cycles = Vec::new();
        for line in lines {
            if let Some(cycle) = self.ingest(line)? {
                cycles.push(cycle);
            }
        }
        Ok(cycles)
    }

    /// [`ingest`](Self::ingest) for callers on an async runtime. The
    /// embedding call runs on the blocking pool.
    pub async fn ingest_async(&self, line: LogLine) -> RecallResult<Option<CycleOutput>> {
        let span = recall_observability::ingest_span!(line.id);
        let Some(prepared) = span.in_scope(|| self.prepare(&line)) else {
            return Ok(None);
        };

        let provider = Arc::clone(&self.provider);
        let text = line.text.clone();
        let vector = tokio::task::spawn_blocking(move || provider.embed(&text))
            .await
            .unwrap_or_else(|e| Err(RecallError::Concurrency(format!("embedding task aborted: {e}"))));

        let Some(Fired { fire, snapshot }) = span.in_scope(|| self.commit(&line, prepared, vector))? else {
            return Ok(None);
        };
        self.counters.record_fire();
        Ok(Some(self.run_cycle(fire, snapshot, anchor(&line)).await?))
    }

    /// Count the line, extract and filter its entities. `None` when
    /// extraction failed and the line is skipped.
    fn prepare(&self, line: &LogLine) -> Option<Prepared> {
        self.counters.record_line();
        let mut extraction = match self.extractor.extract(line) {
            Ok(extraction) => extraction,
            Err(e) => {
                self.counters.record_extraction_failure();
                tracing::debug!(line = %line.id, error = %e, "extraction failed; line skipped");
                return None;
            }
        };
        self.filter.retain(&mut extraction);
        let mentioned = extraction.entities.iter().filter_map(|c| c.id()).collect();
        Some(Prepared {
            extraction,
            mentioned,
            severity: severity_level(&self.trigger, &line.text),
        })
    }

    /// Index the embedded line, then run the writer step.
    fn commit(
        &self,
        line: &LogLine,
        prepared: Prepared,
        vector: RecallResult<Vec<f32>>,
    ) -> RecallResult<Option<Fired>> {
        match vector {
            Ok(vector) => self.index_line(line, prepared.mentioned, prepared.severity, vector)?,
            Err(e) => {
                self.counters.record_index_insert_failure();
                tracing::debug!(line = %line.id, error = %e, "line not embedded");
            }
        }
        self.lock_writer()?.step(line, prepared.extraction, &self.counters)
    }

    async fn run_cycle(
        &self,
        fire: FireEvent,
        snapshot: Arc<GraphSnapshot>,
        anchor: Anchor,
    ) -> RecallResult<CycleOutput> {
        let cycle_id = format!("cycle-{}", fire.version);
        let span = recall_observability::cycle_span!(cycle_id, fire.reason);

        let outcome = self
            .retriever
            .retrieve(Arc::clone(&snapshot), fire.seeds.clone(), Some(anchor), &cycle_id)
            .await;

        let _entered = span.enter();
        self.track_paths(&outcome, fire.at)?;

        let packed = self.packer.pack(&cycle_id, &snapshot, &outcome.evidence, outcome.partial);
        if packed.text_pack.truncated {
            self.counters.record_truncation();
        }

        let prediction = self.generator.as_ref().and_then(|generator| {
            let query = build_query(&fire, &snapshot);
            match generator.generate(&query, &packed) {
                Ok(answer) => Some(PredictionRecord {
                    id: cycle_id.clone(),
                    query,
                    answer,
                    evidence_refs: packed
                        .text_pack
                        .items
                        .iter()
                        .map(|u| u.provenance_tag.clone())
                        .collect(),
                }),
                Err(e) => {
                    tracing::warn!(cycle_id = %cycle_id, generator = generator.name(), error = %e, "generation failed");
                    None
                }
            }
        });

        events::cycle_completed(
            &cycle_id,
            outcome.evidence.len(),
            outcome.partial,
            packed.graph_pack.nodes.len(),
            packed.graph_pack.edges.len(),
        );
        Ok(CycleOutput {
            fire,
            outcome,
            packed,
            prediction,
        })
    }

    fn index_line(&self, line: &LogLine, entities: Vec<EntityId>, severity: u8, vector: Vec<f32>) -> RecallResult<()> {
        let snippet = IndexedSnippet {
            log_id: line.id,
            ts: line.ts,
            text: line.text.clone(),
            entities,
            severity,
            vector,
        };
        let mut index = self
            .index
            .write()
            .map_err(|e| RecallError::Concurrency(format!("vector index lock poisoned: {e}")))?;
        if let Err(e) = index.insert(snippet) {
            self.counters.record_index_insert_failure();
            tracing::debug!(line = %line.id, error = %e, "line not indexed");
        }
        Ok(())
    }

    /// Count path failures and open or close degradation records.
    fn track_paths(&self, outcome: &RetrievalOutcome, at: DateTime<Utc>) -> RecallResult<()> {
        if outcome.partial {
            self.counters.record_partial_cycle();
        }
        let mut tracker = self.lock_degradation()?;
        for (component, status, fallback) in [
            (SEMANTIC_PATH, &outcome.semantic.status, "structural path only"),
            (STRUCTURAL_PATH, &outcome.structural.status, "semantic path only"),
        ] {
            match status {
                PathStatus::Ok => {
                    if tracker.is_degraded(component) {
                        tracker.mark_recovered(component, at);
                    }
                }
                PathStatus::TimedOut { .. } | PathStatus::Failed { .. } => {
                    if matches!(status, PathStatus::TimedOut { .. }) {
                        self.counters.record_provider_timeout();
                    } else {
                        self.counters.record_provider_failure();
                    }
                    tracker.record(DegradationEvent {
                        component: component.to_string(),
                        failure: status.to_string(),
                        fallback_used: fallback.to_string(),
                        timestamp: at,
                    });
                }
            }
        }
        Ok(())
    }

    fn lock_writer(&self) -> RecallResult<MutexGuard<'_, Writer>> {
        self.writer
            .lock()
            .map_err(|e| RecallError::Concurrency(format!("graph writer lock poisoned: {e}")))
    }

    fn lock_degradation(&self) -> RecallResult<MutexGuard<'_, DegradationTracker>> {
        self.degradation
            .lock()
            .map_err(|e| RecallError::Concurrency(format!("degradation tracker lock poisoned: {e}")))
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Cloneable handle to the latest published snapshot.
    pub fn reader(&self) -> SnapshotReader {
        self.reader.clone()
    }

    pub fn snapshot(&self) -> RecallResult<Arc<GraphSnapshot>> {
        self.reader.latest()
    }

    pub fn index(&self) -> SharedIndex {
        Arc::clone(&self.index)
    }

    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }

    pub fn trigger_phase(&self) -> RecallResult<Phase> {
        Ok(self.lock_writer()?.evaluator().phase())
    }

    /// Event time of the last ingested line.
    pub fn now(&self) -> RecallResult<Option<DateTime<Utc>>> {
        Ok(self.lock_writer()?.now())
    }

    pub fn degradation(&self) -> RecallResult<DegradationTracker> {
        Ok(self.lock_degradation()?.clone())
    }
}

impl Drop for RecallPipeline {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

fn anchor(line: &LogLine) -> Anchor {
    Anchor {
        log_id: line.id,
        ts: line.ts,
    }
}
