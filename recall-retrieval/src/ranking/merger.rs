//! Merge semantic and structural hits into one ranked evidence list.
//!
//! Each path's scores are max-normalized to [0, 1] first, so the blend
//! `alpha * semantic + (1 - alpha) * structural` compares like with like. An
//! item missing from a path scores 0 there.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use recall_core::config::RetrievalConfig;
use recall_core::ids::LogId;
use recall_core::models::{EvidenceItem, EvidenceRef, PathTag, Provenance, QueryOrigin};

use crate::search::PathHit;

#[derive(Debug, Clone)]
pub struct Merger {
    alpha: f64,
    max_evidence: usize,
}

#[derive(Debug)]
struct Accumulated {
    path: PathTag,
    semantic: f64,
    structural: f64,
    last_seen: DateTime<Utc>,
    text: Option<String>,
    source_log: Option<LogId>,
    origins: Vec<QueryOrigin>,
}

impl Merger {
    pub fn new(alpha: f64, max_evidence: usize) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            max_evidence,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.alpha, config.max_evidence)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Ranked, deduplicated, capped evidence. Order: rank score descending,
    /// then more recent `last_seen`, then reference ascending.
    pub fn merge(&self, cycle_id: &str, semantic: &[PathHit], structural: &[PathHit]) -> Vec<EvidenceItem> {
        let mut merged: BTreeMap<EvidenceRef, Accumulated> = BTreeMap::new();

        for (tag, hits) in [(PathTag::Semantic, semantic), (PathTag::Structural, structural)] {
            let scores = normalize(hits.iter().map(|h| h.score));
            for (hit, score) in hits.iter().zip(scores) {
                let entry = merged.entry(hit.reference.clone()).or_insert_with(|| Accumulated {
                    path: tag,
                    semantic: 0.0,
                    structural: 0.0,
                    last_seen: hit.last_seen,
                    text: None,
                    source_log: None,
                    origins: Vec::new(),
                });
                entry.path = entry.path.merge(tag);
                match tag {
                    PathTag::Semantic => entry.semantic = entry.semantic.max(score),
                    _ => entry.structural = entry.structural.max(score),
                }
                entry.last_seen = entry.last_seen.max(hit.last_seen);
                // Semantic text is the matching line itself; keep it over the
                // entity's latest mention.
                if entry.text.is_none() {
                    entry.text = hit.text.clone();
                    entry.source_log = hit.source_log;
                }
                entry.origins.push(hit.origin.clone());
            }
        }

        let mut items: Vec<EvidenceItem> = merged
            .into_iter()
            .map(|(reference, mut acc)| {
                acc.origins.sort();
                acc.origins.dedup();
                EvidenceItem {
                    reference,
                    path: acc.path,
                    raw_score: acc.semantic.max(acc.structural),
                    semantic_score: acc.semantic,
                    structural_score: acc.structural,
                    rank_score: self.alpha * acc.semantic + (1.0 - self.alpha) * acc.structural,
                    last_seen: acc.last_seen,
                    text: acc.text,
                    source_log: acc.source_log,
                    provenance: Provenance {
                        cycle_id: cycle_id.to_string(),
                        origins: acc.origins,
                    },
                }
            })
            .collect();

        items.sort_by(rank_order);
        items.truncate(self.max_evidence);
        items
    }
}

fn rank_order(a: &EvidenceItem, b: &EvidenceItem) -> Ordering {
    b.rank_score
        .total_cmp(&a.rank_score)
        .then_with(|| b.last_seen.cmp(&a.last_seen))
        .then_with(|| a.reference.cmp(&b.reference))
}

/// Divide by the maximum so the best hit scores 1.0. Non-finite and negative
/// scores become 0; an all-zero list stays zero.
pub fn normalize(scores: impl Iterator<Item = f64>) -> Vec<f64> {
    let clean: Vec<f64> = scores
        .map(|s| if s.is_finite() { s.max(0.0) } else { 0.0 })
        .collect();
    let max = clean.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return clean;
    }
    clean.into_iter().map(|s| (s / max).min(1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use recall_core::ids::EntityId;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(secs)
    }

    fn id(v: &str) -> EntityId {
        EntityId::derive("token", v).unwrap()
    }

    fn hit(reference: EvidenceRef, score: f64, secs: i64, origin: QueryOrigin) -> PathHit {
        PathHit {
            reference,
            score,
            last_seen: t(secs),
            text: None,
            source_log: None,
            origin,
        }
    }

    fn sem(v: &str, score: f64, secs: i64) -> PathHit {
        hit(EvidenceRef::Entity(id(v)), score, secs, QueryOrigin::SemanticTopK { rank: 0 })
    }

    fn st(v: &str, score: f64, secs: i64) -> PathHit {
        hit(
            EvidenceRef::Entity(id(v)),
            score,
            secs,
            QueryOrigin::Traversal { seed: id("seed"), depth: 1 },
        )
    }

    #[test]
    fn normalize_scales_to_unit_max() {
        assert_eq!(normalize([0.2, 0.4, 0.1].into_iter()), vec![0.5, 1.0, 0.25]);
        assert_eq!(normalize([0.0, 0.0].into_iter()), vec![0.0, 0.0]);
        assert_eq!(normalize([f64::NAN, -1.0, 2.0].into_iter()), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn item_on_both_paths_is_tagged_both() {
        let merger = Merger::new(0.6, 10);
        let out = merger.merge("c", &[sem("a", 0.9, 0)], &[st("a", 0.5, 0)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, PathTag::Both);
        assert_eq!(out[0].raw_score, 1.0);
        assert!((out[0].rank_score - 1.0).abs() < 1e-12);
        assert_eq!(out[0].provenance.origins.len(), 2);
    }

    #[test]
    fn alpha_weights_the_blend() {
        let merger = Merger::new(0.6, 10);
        let out = merger.merge("c", &[sem("a", 1.0, 0)], &[st("b", 1.0, 0)]);
        assert_eq!(out[0].entity_id(), Some(&id("a")));
        assert!((out[0].rank_score - 0.6).abs() < 1e-12);
        assert!((out[1].rank_score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn ties_prefer_recent_then_lexical_id() {
        let merger = Merger::new(0.5, 10);
        let out = merger.merge("c", &[], &[st("a", 1.0, 0), st("b", 1.0, 10), st("c", 1.0, 0)]);
        assert_eq!(out[0].entity_id(), Some(&id("b")));
        let (x, y) = (id("a"), id("c"));
        let first_of_rest = if x < y { x } else { y };
        assert_eq!(out[1].entity_id(), Some(&first_of_rest));
    }

    #[test]
    fn output_is_capped() {
        let merger = Merger::new(0.5, 2);
        let out = merger.merge("c", &[sem("a", 0.3, 0), sem("b", 0.2, 0)], &[st("c", 1.0, 0)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn semantic_text_wins() {
        let mut s = sem("a", 1.0, 0);
        s.text = Some("matched line".into());
        let mut g = st("a", 1.0, 0);
        g.text = Some("latest mention".into());
        let out = Merger::new(0.5, 10).merge("c", &[s], &[g]);
        assert_eq!(out[0].text.as_deref(), Some("matched line"));
    }
}
