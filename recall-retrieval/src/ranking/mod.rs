//! Cross-path deduplication and ranking.

pub mod merger;

pub use merger::{normalize, Merger};
