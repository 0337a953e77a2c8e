//! # recall-tokens
//!
//! Measures text against the TextPack budget, either in `cl100k_base` tokens
//! via `tiktoken-rs` or in UTF-8 bytes. Token counts are cached per content
//! hash.

pub mod budget;
pub mod counter;

pub use budget::{Meter, TokenBudget};
pub use counter::TokenCounter;
