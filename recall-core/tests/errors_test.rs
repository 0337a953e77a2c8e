use recall_core::errors::*;
use recall_core::LogId;

#[test]
fn graph_error_dangling_edge_names_missing_endpoint() {
    let err = GraphError::DanglingEdge {
        src: "aaaa".into(),
        dst: "bbbb".into(),
        missing: "bbbb".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("aaaa"));
    assert!(msg.contains("missing endpoint bbbb"));
}

#[test]
fn retrieval_timeout_carries_path_and_duration() {
    let err = RetrievalError::ProviderTimeout {
        path: "semantic".into(),
        timeout_ms: 250,
    };
    let msg = err.to_string();
    assert!(msg.contains("semantic"));
    assert!(msg.contains("250"));
}

#[test]
fn extraction_error_carries_line() {
    let err = ExtractionError::LineFailed {
        line: LogId(42),
        reason: "bad json".into(),
    };
    assert!(err.to_string().contains("log#42"));
}

// --- From impls ---

#[test]
fn graph_error_converts_to_recall_error() {
    let err: RecallError = GraphError::MalformedIdentifier { id: "x".into() }.into();
    assert!(matches!(err, RecallError::GraphError(_)));
}

#[test]
fn embedding_error_converts_to_recall_error() {
    let err: RecallError = EmbeddingError::DimensionMismatch {
        expected: 256,
        actual: 128,
    }
    .into();
    assert!(matches!(err, RecallError::EmbeddingError(_)));
}

#[test]
fn config_error_converts_to_recall_error() {
    let err: RecallError = ConfigError::Parse {
        reason: "eof".into(),
    }
    .into();
    assert!(matches!(err, RecallError::ConfigError(_)));
}
