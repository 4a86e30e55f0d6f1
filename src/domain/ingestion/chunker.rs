//! Chunk types and chunking configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::validation::validate_chunk_params;
use crate::domain::DomainError;

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default overlap between consecutive chunks in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Configuration for chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration; the overlap must stay below the chunk size
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_chunk_params(self.chunk_size, self.chunk_overlap)
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

/// Metadata attached to every chunk and stored alongside its embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Identifier of the source file in the file store
    pub file_id: i64,
    /// Original filename
    pub filename: String,
    /// Position of this chunk within its parse (0-based)
    pub chunk_id: usize,
    /// Character offset where this chunk starts
    pub start: usize,
    /// Character offset where this chunk ends (exclusive, before trimming)
    pub end: usize,
}

impl ChunkMetadata {
    /// Create new chunk metadata
    pub fn new(
        file_id: i64,
        filename: impl Into<String>,
        chunk_id: usize,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            file_id,
            filename: filename.into(),
            chunk_id,
            start,
            end,
        }
    }

    /// Convert to JSON value map
    pub fn to_json_map(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert(
            "file_id".to_string(),
            serde_json::Value::Number(self.file_id.into()),
        );
        map.insert(
            "filename".to_string(),
            serde_json::Value::String(self.filename.clone()),
        );
        map.insert(
            "chunk_id".to_string(),
            serde_json::Value::Number(self.chunk_id.into()),
        );
        map.insert(
            "start_offset".to_string(),
            serde_json::Value::Number(self.start.into()),
        );
        map.insert(
            "end_offset".to_string(),
            serde_json::Value::Number(self.end.into()),
        );
        map
    }
}

/// A chunk of text extracted from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    /// Chunk text, stripped of surrounding whitespace
    pub text: String,
    /// Chunk metadata
    pub metadata: ChunkMetadata,
    /// Sequential id within one parse
    pub chunk_id: usize,
}

impl DocumentChunk {
    /// Create a new chunk
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        let chunk_id = metadata.chunk_id;
        Self {
            text: text.into(),
            metadata,
            chunk_id,
        }
    }

    /// Length of the chunk text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the chunk is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split a parse result into the index-aligned texts and metadata maps the
/// indexing pipeline consumes
pub fn into_texts_and_metadatas(
    chunks: Vec<DocumentChunk>,
) -> (Vec<String>, Vec<HashMap<String, serde_json::Value>>) {
    chunks
        .into_iter()
        .map(|chunk| {
            let metadata = chunk.metadata.to_json_map();
            (chunk.text, metadata)
        })
        .unzip()
}
