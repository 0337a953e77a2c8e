use chrono::Duration;
use criterion::{criterion_group, criterion_main, Criterion};

use recall_core::config::GraphConfig;
use recall_core::models::EntityCandidate;
use recall_graph::traversal::{traverse, TraversalConfig};
use recall_graph::{GraphStore, UpsertBatch};
use test_fixtures::{co_occurs, t0};

/// 1K entities in a ring with chords, built one batch per pair.
fn build_store() -> GraphStore {
    let mut store = GraphStore::new(GraphConfig::default());
    let n = 1000;
    for i in 0..n {
        let a = EntityCandidate::new("block_id", format!("blk_{i}"));
        let b = EntityCandidate::new("block_id", format!("blk_{}", (i + 1) % n));
        let c = EntityCandidate::new("block_id", format!("blk_{}", (i * 7) % n));
        let rels = vec![co_occurs(&a, &b), co_occurs(&a, &c)];
        store
            .upsert(UpsertBatch::new(vec![a, b, c], rels, t0() + Duration::seconds(i as i64)))
            .unwrap();
    }
    store
}

fn bench_upsert(c: &mut Criterion) {
    let mut store = build_store();
    let mut i = 0_i64;
    c.bench_function("graph_upsert_line_1k_entities", |b| {
        b.iter(|| {
            i += 1;
            let a = EntityCandidate::new("ip", format!("10.0.{}.{}", (i / 256) % 256, i % 256));
            let blk = EntityCandidate::new("block_id", format!("blk_{}", i % 1000));
            let rels = vec![co_occurs(&a, &blk)];
            store
                .upsert(UpsertBatch::new(vec![a, blk], rels, t0() + Duration::seconds(1000 + i)))
                .unwrap();
        });
    });
}

fn bench_traversal(c: &mut Criterion) {
    let store = build_store();
    let snap = store.snapshot();
    let seed = EntityCandidate::new("block_id", "blk_0").id().unwrap();
    let config = TraversalConfig {
        max_depth: 3,
        ..TraversalConfig::default()
    };
    c.bench_function("graph_traversal_depth_3", |b| {
        b.iter(|| traverse(&snap, std::slice::from_ref(&seed), &config));
    });
}

criterion_group!(benches, bench_upsert, bench_traversal);
criterion_main!(benches);
