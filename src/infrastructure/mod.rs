//! Infrastructure layer - backend, storage and service implementations

pub mod embedding;
pub mod indexed_file;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod services;
pub mod vector_store;
