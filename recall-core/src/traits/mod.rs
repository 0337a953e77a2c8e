//! Capability interfaces for the external collaborators.

mod embedding;
mod extractor;
mod generator;

pub use embedding::IEmbeddingProvider;
pub use extractor::IEntityExtractor;
pub use generator::IGenerator;
