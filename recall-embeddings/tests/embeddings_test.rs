use std::sync::Arc;

use recall_core::config::EmbeddingConfig;
use recall_core::ids::LogId;
use recall_core::traits::IEmbeddingProvider;
use recall_embeddings::{create_provider, IndexedSnippet, VectorIndex};
use test_fixtures::{at, t0};

#[test]
fn default_config_builds_cached_tfidf() {
    let provider = create_provider(&EmbeddingConfig::default()).unwrap();
    assert_eq!(provider.name(), "hashed-tfidf");
    assert_eq!(provider.dimensions(), 256);
    assert!(provider.is_available());
}

#[test]
fn unknown_provider_is_a_config_error() {
    let config = EmbeddingConfig {
        provider: "carrier-pigeon".to_string(),
        ..EmbeddingConfig::default()
    };
    assert!(create_provider(&config).is_err());
}

#[test]
fn http_provider_needs_endpoint() {
    let config = EmbeddingConfig {
        provider: "http".to_string(),
        http_endpoint: None,
        ..EmbeddingConfig::default()
    };
    assert!(create_provider(&config).is_err());
}

#[test]
fn similar_log_lines_rank_first() {
    let provider: Arc<dyn IEmbeddingProvider> = create_provider(&EmbeddingConfig::default()).unwrap();
    let mut index = VectorIndex::new(provider.dimensions(), 100);
    let lines = [
        "Receiving block blk_1 src: /10.250.19.102:54106 dest: /10.250.19.102:50010",
        "PacketResponder 1 for block blk_2 terminating",
        "Exception in receiveBlock for block blk_3 java.io.IOException: Connection reset by peer",
        "Verification succeeded for blk_4",
    ];
    for (i, line) in lines.iter().enumerate() {
        index
            .insert(IndexedSnippet {
                log_id: LogId(i as u64),
                ts: t0(),
                text: line.to_string(),
                entities: vec![],
                severity: 0,
                vector: provider.embed(line).unwrap(),
            })
            .unwrap();
    }

    let query = provider.embed("IOException in receiveBlock connection reset").unwrap();
    let hits = index.search(&query, 2).unwrap();
    assert_eq!(hits[0].log_id, LogId(2));
}

fn unit_snippet(id: u64, secs: i64) -> IndexedSnippet {
    IndexedSnippet {
        log_id: LogId(id),
        ts: at(secs),
        text: format!("line {id}"),
        entities: vec![],
        severity: 0,
        vector: vec![1.0, 0.0, 0.0, 0.0],
    }
}

#[test]
fn capacity_drops_oldest_and_eviction_uses_event_time() {
    let mut index = VectorIndex::new(4, 3);
    for id in 0..5 {
        index.insert(unit_snippet(id, id as i64 * 10)).unwrap();
    }
    assert_eq!(index.len(), 3);
    assert!(index.get(LogId(1)).is_none());
    assert!(index.get(LogId(2)).is_some());

    assert_eq!(index.evict_before(at(30)), 1);
    assert_eq!(index.len(), 2);
    assert!(index.get(LogId(2)).is_none());
    assert_eq!(index.evict_before(at(30)), 0);
}
