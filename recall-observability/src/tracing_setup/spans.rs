//! Span definitions per operation: ingest, retrieval cycle, retrieval path, packing.

/// Create an ingest span for one log line.
#[macro_export]
macro_rules! ingest_span {
    ($log_id:expr) => {
        tracing::debug_span!("recall.ingest", log_id = %$log_id)
    };
}

/// Create a retrieval cycle span.
#[macro_export]
macro_rules! cycle_span {
    ($cycle_id:expr, $reason:expr) => {
        tracing::info_span!("recall.cycle", cycle_id = %$cycle_id, reason = %$reason)
    };
}

/// Create a span for one retrieval path.
#[macro_export]
macro_rules! path_span {
    ($path:expr) => {
        tracing::debug_span!("recall.path", path = %$path)
    };
}

/// Create a packing span.
#[macro_export]
macro_rules! pack_span {
    ($budget:expr) => {
        tracing::debug_span!("recall.pack", budget = $budget)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const INGEST: &str = "recall.ingest";
    pub const CYCLE: &str = "recall.cycle";
    pub const PATH: &str = "recall.path";
    pub const PACK: &str = "recall.pack";
}
