//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentChunk` and `ChunkingConfig` for the chunking step
//! - `DocumentParser` trait for extracting text from stored files
//! - The extension table and validation helpers used at the upload boundary

pub mod chunker;
pub mod parser;
pub mod validation;

// Re-export main types
pub use chunker::{
    into_texts_and_metadatas, ChunkMetadata, ChunkingConfig, DocumentChunk, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE,
};
pub use parser::{DocumentParser, ParserType};
pub use validation::{
    detect_parser_from_filename, file_extension, validate_chunk_params, validate_filename,
    validate_upload_size, PARSER_TABLE,
};
