//! # recall-embeddings
//!
//! The semantic side of retrieval:
//! - providers that turn text into vectors ([`providers`]),
//! - a blake3-keyed `moka` cache in front of any provider ([`CachedProvider`]),
//! - the [`VectorIndex`] of historical log snippets searched by cosine
//!   similarity.

pub mod cache;
pub mod index;
pub mod providers;
pub mod similarity;

pub use cache::CachedProvider;
pub use index::{IndexedSnippet, SearchHit, SharedIndex, VectorIndex};
pub use providers::{create_provider, HashedTfIdfProvider, HttpEmbeddingProvider};
