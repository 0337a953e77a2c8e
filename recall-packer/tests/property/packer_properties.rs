//! Property tests: TextPack never exceeds its budget and only cuts at item
//! boundaries; GraphPack survives a JSON round trip and stays closed over
//! its nodes.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use recall_core::config::GraphConfig;
use recall_core::ids::{EntityId, LogId};
use recall_core::models::{EntityCandidate, EvidenceItem, EvidenceRef, Extraction, GraphPack, LogLine, PathTag, Provenance};
use recall_graph::{GraphStore, UpsertBatch};
use recall_packer::{pack_graph, pack_text};
use recall_tokens::Meter;
use test_fixtures::{at, co_occurs, entity};

const POOL: usize = 12;

fn pooled(i: usize) -> EntityCandidate {
    if i % 2 == 0 {
        entity("block_id", &format!("blk_{i}"))
    } else {
        entity("ip", &format!("10.0.0.{i}"))
    }
}

/// One line per entry; consecutive mentions on a line co-occur.
fn store_from(lines: &[Vec<usize>]) -> GraphStore {
    let mut store = GraphStore::new(GraphConfig::default());
    for (n, members) in lines.iter().enumerate() {
        let entities: Vec<EntityCandidate> = members.iter().map(|&i| pooled(i)).collect();
        let relations = entities
            .windows(2)
            .filter(|w| w[0] != w[1])
            .map(|w| co_occurs(&w[0], &w[1]))
            .collect();
        let ts = at(n as i64 * 45);
        let line = LogLine::new(n as u64, ts, format!("line {n}"));
        store
            .upsert(UpsertBatch::from_line(&line, Extraction { entities, relations }, ts))
            .unwrap();
    }
    store
}

fn entity_evidence(id: EntityId) -> EvidenceItem {
    let mut item = snippet(0, String::new());
    item.reference = EvidenceRef::Entity(id);
    item.text = None;
    item
}

fn snippet(i: usize, text: String) -> EvidenceItem {
    EvidenceItem {
        reference: EvidenceRef::Snippet(LogId(i as u64)),
        path: PathTag::Semantic,
        raw_score: 1.0,
        semantic_score: 1.0,
        structural_score: 0.0,
        rank_score: 1.0,
        last_seen: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        text: Some(text),
        source_log: Some(LogId(i as u64)),
        provenance: Provenance {
            cycle_id: "c".to_string(),
            origins: vec![],
        },
    }
}

proptest! {
    #[test]
    fn text_pack_respects_budget(
        texts in prop::collection::vec("[a-z]{1,5}( [a-z]{1,5}){0,6}", 0..40),
        budget in 0usize..200,
    ) {
        let evidence: Vec<_> = texts.into_iter().enumerate().map(|(i, t)| snippet(i, t)).collect();
        let pack = pack_text("c", &evidence, &Meter::Bytes, budget, false);

        prop_assert!(pack.size <= budget);
        let total: usize = pack.items.iter().map(|u| u.text.len()).sum();
        prop_assert_eq!(total, pack.size);

        // Whole items only, in evidence order.
        let mut cursor = evidence.iter();
        for unit in &pack.items {
            prop_assert!(cursor.any(|e| e.text.as_deref() == Some(unit.text.as_str())));
        }
        if !pack.truncated {
            let mut distinct: Vec<&str> = evidence.iter().filter_map(|e| e.text.as_deref()).collect();
            distinct.sort();
            distinct.dedup();
            prop_assert_eq!(pack.items.len(), distinct.len());
        }
    }

    #[test]
    fn graph_pack_survives_json_and_stays_closed(
        lines in prop::collection::vec(prop::collection::vec(0..POOL, 1..5), 1..20),
        picked in prop::collection::vec(any::<bool>(), POOL),
        snippets in 0usize..4,
    ) {
        let store = store_from(&lines);
        let snapshot = store.snapshot();

        let mut evidence: Vec<EvidenceItem> = (0..snippets).map(|i| snippet(i, format!("line {i}"))).collect();
        let mut wanted = BTreeSet::new();
        for (i, pick) in picked.iter().enumerate() {
            if *pick {
                let id = pooled(i).id().unwrap();
                wanted.insert(id.clone());
                evidence.push(entity_evidence(id));
            }
        }

        let pack = pack_graph(&snapshot, &evidence);
        prop_assert_eq!(pack.version, snapshot.version());

        // Nodes: exactly the wanted entities the snapshot holds, sorted.
        prop_assert!(pack.nodes.windows(2).all(|w| w[0].id < w[1].id));
        let nodes: BTreeSet<EntityId> = pack.nodes.iter().map(|n| n.id.clone()).collect();
        let expected: BTreeSet<EntityId> = wanted.into_iter().filter(|id| snapshot.contains(id)).collect();
        prop_assert_eq!(&nodes, &expected);
        for edge in &pack.edges {
            prop_assert!(nodes.contains(&edge.src) && nodes.contains(&edge.dst));
        }

        let back = GraphPack::from_json(&pack.to_json().unwrap()).unwrap();
        prop_assert_eq!(back.version, pack.version);
        prop_assert_eq!(back.nodes.len(), pack.nodes.len());
        prop_assert_eq!(back.edges.len(), pack.edges.len());
        for (b, p) in back.nodes.iter().zip(&pack.nodes) {
            prop_assert_eq!((&b.id, &b.etype, &b.value), (&p.id, &p.etype, &p.value));
            prop_assert!((b.weight - p.weight).abs() < 1e-12);
        }
        for (b, p) in back.edges.iter().zip(&pack.edges) {
            prop_assert_eq!((&b.src, &b.dst, &b.kind), (&p.src, &p.dst, &p.kind));
            prop_assert!((b.weight - p.weight).abs() < 1e-12);
        }
    }
}
