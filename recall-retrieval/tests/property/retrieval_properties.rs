//! Property tests for the merger: ordering, capping, bounded scores.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use recall_core::ids::{EntityId, LogId};
use recall_core::models::{EvidenceRef, QueryOrigin};
use recall_retrieval::{Merger, PathHit};

fn hit(key: u8, score: f64, secs: i64, semantic: bool) -> PathHit {
    let reference = if key % 5 == 0 {
        EvidenceRef::Snippet(LogId(u64::from(key)))
    } else {
        EvidenceRef::Entity(EntityId::derive("token", &format!("e{key}")).unwrap())
    };
    let origin = if semantic {
        QueryOrigin::SemanticTopK { rank: key as usize }
    } else {
        QueryOrigin::Traversal {
            seed: EntityId::derive("token", "seed").unwrap(),
            depth: 1,
        }
    };
    PathHit {
        reference,
        score,
        last_seen: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs),
        text: None,
        source_log: None,
        origin,
    }
}

fn hits(semantic: bool) -> impl Strategy<Value = Vec<PathHit>> {
    prop::collection::vec((0u8..40, 0.0f64..5.0, 0i64..100), 0..30)
        .prop_map(move |v| v.into_iter().map(|(k, s, t)| hit(k, s, t, semantic)).collect())
}

proptest! {
    #[test]
    fn merged_evidence_is_ranked_unique_and_bounded(
        semantic in hits(true),
        structural in hits(false),
        alpha in 0.0f64..=1.0,
        cap in 1usize..50,
    ) {
        let out = Merger::new(alpha, cap).merge("c", &semantic, &structural);
        prop_assert!(out.len() <= cap);
        for w in out.windows(2) {
            prop_assert!(w[0].rank_score >= w[1].rank_score);
        }
        let mut refs: Vec<_> = out.iter().map(|e| e.reference.clone()).collect();
        refs.sort();
        let before = refs.len();
        refs.dedup();
        prop_assert_eq!(before, refs.len());
        for item in &out {
            prop_assert!((0.0..=1.0).contains(&item.semantic_score));
            prop_assert!((0.0..=1.0).contains(&item.structural_score));
            prop_assert!((0.0..=1.0 + 1e-12).contains(&item.rank_score));
        }
    }

    #[test]
    fn merge_is_deterministic(semantic in hits(true), structural in hits(false)) {
        let merger = Merger::new(0.6, 30);
        prop_assert_eq!(
            merger.merge("c", &semantic, &structural),
            merger.merge("c", &semantic, &structural)
        );
    }
}
