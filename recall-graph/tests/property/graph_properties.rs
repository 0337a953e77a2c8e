//! Property tests for recall-graph: weight bounds, referential integrity,
//! traversal bounds.

use chrono::Duration;
use proptest::prelude::*;

use recall_core::config::GraphConfig;
use recall_core::models::{EntityCandidate, RelationCandidate};
use recall_graph::traversal::{traverse, TraversalConfig};
use recall_graph::{GraphStore, UpsertBatch};
use test_fixtures::t0;

/// One step of a random workload: an upsert (entity picks, relation picks,
/// confidence) or a decay after `secs`.
#[derive(Debug, Clone)]
enum Step {
    Upsert(Vec<usize>, Vec<(usize, usize)>, f64),
    Decay(i64),
}

fn step_strategy(n: usize) -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (
            prop::collection::vec(0..n, 0..6),
            prop::collection::vec((0..n, 0..n), 0..6),
            0.0_f64..=1.0_f64,
        )
            .prop_map(|(e, r, c)| Step::Upsert(e, r, c)),
        1 => (1_i64..3_000).prop_map(Step::Decay),
    ]
}

fn candidate(i: usize) -> EntityCandidate {
    EntityCandidate::new("block_id", format!("blk_{i}"))
}

fn run(steps: &[Step], config: GraphConfig) -> GraphStore {
    let mut store = GraphStore::new(config);
    let mut now = t0();
    for step in steps {
        match step {
            Step::Upsert(ents, rels, conf) => {
                let entities = ents.iter().map(|&i| candidate(i).with_confidence(*conf)).collect();
                let relations = rels
                    .iter()
                    .filter_map(|&(a, b)| RelationCandidate::between(&candidate(a), &candidate(b), "co_occurs"))
                    .map(|r| r.with_confidence(*conf))
                    .collect();
                now += Duration::seconds(1);
                store.upsert(UpsertBatch::new(entities, relations, now)).unwrap();
            }
            Step::Decay(secs) => {
                now += Duration::seconds(*secs);
                store.decay(now).unwrap();
            }
        }
    }
    store
}

// =============================================================================
// Weights stay in [0, 1]
// =============================================================================
proptest! {
    #[test]
    fn weights_stay_in_unit_interval(steps in prop::collection::vec(step_strategy(12), 1..40)) {
        let store = run(&steps, GraphConfig::default());
        let snap = store.snapshot();
        for e in snap.entities() {
            prop_assert!((0.0..=1.0).contains(&e.weight), "entity weight {}", e.weight);
        }
        for r in snap.relations() {
            prop_assert!((0.0..=1.0).contains(&r.weight), "edge weight {}", r.weight);
        }
    }
}

// =============================================================================
// No relation outlives an endpoint
// =============================================================================
proptest! {
    #[test]
    fn relations_always_reference_live_entities(steps in prop::collection::vec(step_strategy(10), 1..40)) {
        let config = GraphConfig {
            half_life_secs: 30,
            activity_grace_secs: 10,
            ..GraphConfig::default()
        };
        let store = run(&steps, config);
        let snap = store.snapshot();
        prop_assert!(snap.is_consistent());
        for r in snap.relations() {
            prop_assert!(snap.contains(&r.src));
            prop_assert!(snap.contains(&r.dst));
        }
    }
}

// =============================================================================
// Version counts mutations
// =============================================================================
proptest! {
    #[test]
    fn version_equals_number_of_mutations(steps in prop::collection::vec(step_strategy(8), 0..30)) {
        let store = run(&steps, GraphConfig::default());
        prop_assert_eq!(store.version(), steps.len() as u64);
    }
}

// =============================================================================
// Traversal bounds
// =============================================================================
proptest! {
    #[test]
    fn traversal_respects_depth_and_node_caps(
        steps in prop::collection::vec(step_strategy(15), 1..30),
        max_depth in 0_usize..5,
        max_nodes in 1_usize..20,
        seeds in prop::collection::vec(0_usize..15, 1..4),
    ) {
        let store = run(&steps, GraphConfig::default());
        let config = TraversalConfig {
            max_depth,
            max_nodes,
            min_edge_weight: 0.0,
            ..TraversalConfig::default()
        };
        let seed_ids: Vec<_> = seeds.iter().filter_map(|&i| candidate(i).id()).collect();
        let snap = store.snapshot();
        let first = traverse(&snap, &seed_ids, &config);
        prop_assert!(first.nodes.len() <= max_nodes);
        for node in &first.nodes {
            prop_assert!(node.depth <= max_depth);
            prop_assert!(node.path_score <= 1.0 && node.path_score >= 0.0);
        }
        let second = traverse(&snap, &seed_ids, &config);
        prop_assert_eq!(first, second);
    }
}
