//! Local LLM dashboard backend
//!
//! Document ingestion and retrieval for retrieval-augmented chat against a
//! local model-serving daemon:
//! - Parsing uploaded files (plain text and PDF) into overlapping chunks
//! - Embedding chunks and indexing them in a vector store
//! - Similarity search scoped to selected files
//! - Chat grounded on retrieved chunks

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
