use chrono::{TimeZone, Utc};
use recall_core::models::*;
use recall_core::{EntityId, LogId};

#[test]
fn relation_candidate_between_uses_derived_ids() {
    let a = EntityCandidate::new("ip", "10.0.0.1");
    let b = EntityCandidate::new("path", "/var/log/x");
    let rel = RelationCandidate::between(&a, &b, "co_occurs").unwrap();
    assert_eq!(rel.src, a.id().unwrap().as_str());
    assert_eq!(rel.dst, b.id().unwrap().as_str());
    assert_eq!(rel.confidence, 1.0);
}

#[test]
fn relation_candidate_between_rejects_empty_values() {
    let a = EntityCandidate::new("ip", "  ");
    let b = EntityCandidate::new("path", "/var/log/x");
    assert!(RelationCandidate::between(&a, &b, "co_occurs").is_none());
}

#[test]
fn path_tag_merge() {
    assert_eq!(PathTag::Semantic.merge(PathTag::Semantic), PathTag::Semantic);
    assert_eq!(PathTag::Semantic.merge(PathTag::Structural), PathTag::Both);
    assert_eq!(
        serde_json::to_string(&PathTag::Structural).unwrap(),
        "\"structural\""
    );
}

#[test]
fn graph_node_serializes_type_field() {
    let node = GraphNode {
        id: EntityId::derive("ip", "10.0.0.1").unwrap(),
        etype: "ip".into(),
        value: "10.0.0.1".into(),
        weight: 0.5,
    };
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["type"], "ip");
    assert!(json.get("etype").is_none());
}

#[test]
fn entity_id_deserialization_validates() {
    let bad: Result<GraphNode, _> = serde_json::from_str(
        r#"{"id":"NOT-AN-ID","type":"ip","value":"x","weight":0.1}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn text_pack_render_lists_units_in_order() {
    let pack = TextPack {
        items: vec![
            TextUnit {
                text: "first".into(),
                provenance_tag: "c1:a:log#1".into(),
                source_path: PathTag::Semantic,
            },
            TextUnit {
                text: "second".into(),
                provenance_tag: "c1:b:log#2".into(),
                source_path: PathTag::Both,
            },
        ],
        size: 2,
        budget: 10,
        truncated: false,
    };
    assert_eq!(
        pack.render(),
        "[c1:a:log#1] (semantic) first\n[c1:b:log#2] (both) second"
    );
}

#[test]
fn prediction_record_is_one_ndjson_line() {
    let rec = PredictionRecord {
        id: "q1".into(),
        query: "why?".into(),
        answer: "because".into(),
        evidence_refs: vec!["log#3".into()],
    };
    let line = rec.to_ndjson_line().unwrap();
    assert!(!line.contains('\n'));
    let back: PredictionRecord = serde_json::from_str(&line).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn log_line_constructor() {
    let ts = Utc.timestamp_opt(10, 0).unwrap();
    let line = LogLine::new(7, ts, "hello");
    assert_eq!(line.id, LogId(7));
    assert_eq!(line.text, "hello");
}
