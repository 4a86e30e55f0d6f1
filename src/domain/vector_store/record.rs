//! Vector records and their deterministic identifiers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters of the content hash kept in a record id
const CONTENT_HASH_LEN: usize = 16;

/// Build the record id for a chunk
///
/// The id depends only on the file, the chunk position and the chunk text,
/// so indexing the same content twice overwrites instead of duplicating.
pub fn record_id(file_id: i64, chunk_id: usize, text: &str) -> String {
    let digest = hex::encode(Sha256::digest(text.as_bytes()));
    format!("{}_{}_{}", file_id, chunk_id, &digest[..CONTENT_HASH_LEN])
}

/// A single entry in the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub document: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorRecord {
    pub fn new(
        id: impl Into<String>,
        embedding: Vec<f32>,
        document: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            embedding,
            document: document.into(),
            metadata,
        }
    }
}

/// Result of a nearest-neighbour query, as parallel lists ordered nearest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<HashMap<String, serde_json::Value>>,
    pub distances: Vec<f32>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of a metadata lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetResult {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<HashMap<String, serde_json::Value>>,
}
