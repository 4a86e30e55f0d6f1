//! Embedding backends

mod ollama;

pub use ollama::OllamaEmbeddingProvider;
