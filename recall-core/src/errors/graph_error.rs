/// Graph store errors. None of these abort a batch; they are reported per item.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("malformed identifier: {id:?}")]
    MalformedIdentifier { id: String },

    #[error("malformed candidate: {reason}")]
    MalformedCandidate { reason: String },

    #[error("dangling edge {src} -> {dst}: missing endpoint {missing}")]
    DanglingEdge {
        src: String,
        dst: String,
        missing: String,
    },

    #[error("invalid weight {value} for {item}")]
    InvalidWeight { item: String, value: f64 },
}
