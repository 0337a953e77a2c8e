//! # recall-extraction
//!
//! Turns raw log lines into entity and relation candidates. The default
//! backend is [`StatisticalExtractor`]: tokens that are structurally complex
//! and recur within a time window become entities, and entities sharing a
//! line are linked by a co-occurrence relation.

pub mod classify;
pub mod filter;
pub mod recurrence;
pub mod statistical;
pub mod tokenizer;

pub use classify::classify_entity_type;
pub use filter::EntityFilter;
pub use recurrence::TokenRecurrenceCounter;
pub use statistical::StatisticalExtractor;
pub use tokenizer::{token_complexity, tokenize_candidates};
