//! In-process vector store using cosine distance

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::vector_store::{
    cosine_distance, GetResult, MetadataFilter, QueryResult, VectorRecord, VectorStore,
};
use crate::domain::DomainError;

/// Vector store kept in process memory
///
/// Records keep insertion order; adding a record whose id already exists
/// replaces it in place.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    records: Arc<RwLock<Vec<VectorRecord>>>,
}

impl InMemoryVectorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Embedding dimension shared by the stored records, if any
fn stored_dimension(records: &[VectorRecord]) -> Option<usize> {
    records.first().map(|r| r.embedding.len())
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(&self, records: Vec<VectorRecord>) -> Result<(), DomainError> {
        let mut stored = self.records.write().await;

        let expected =
            stored_dimension(&stored).or_else(|| records.first().map(|r| r.embedding.len()));
        if let Some(dimension) = expected {
            if let Some(bad) = records.iter().find(|r| r.embedding.len() != dimension) {
                return Err(DomainError::vector_store(format!(
                    "Record '{}' has dimension {}, expected {}",
                    bad.id,
                    bad.embedding.len(),
                    dimension
                )));
            }
        }

        let count = records.len();
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }

        debug!(added = count, total = stored.len(), "Stored vector records");
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<QueryResult, DomainError> {
        let stored = self.records.read().await;

        if let Some(dimension) = stored_dimension(&stored) {
            if dimension != embedding.len() {
                return Err(DomainError::vector_store(format!(
                    "Query has dimension {}, collection has {}",
                    embedding.len(),
                    dimension
                )));
            }
        }

        let mut scored: Vec<(f32, &VectorRecord)> = stored
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(&r.metadata)))
            .map(|r| (cosine_distance(embedding, &r.embedding), r))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(n_results);

        let mut result = QueryResult::default();
        for (distance, record) in scored {
            result.ids.push(record.id.clone());
            result.documents.push(record.document.clone());
            result.metadatas.push(record.metadata.clone());
            result.distances.push(distance);
        }

        Ok(result)
    }

    async fn get(&self, filter: &MetadataFilter) -> Result<GetResult, DomainError> {
        let stored = self.records.read().await;

        let mut result = GetResult::default();
        for record in stored.iter().filter(|r| filter.matches(&r.metadata)) {
            result.ids.push(record.id.clone());
            result.documents.push(record.document.clone());
            result.metadatas.push(record.metadata.clone());
        }

        Ok(result)
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, DomainError> {
        let mut stored = self.records.write().await;
        let before = stored.len();

        stored.retain(|r| !ids.contains(&r.id));

        Ok(before - stored.len())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().await.len())
    }

    fn store_name(&self) -> &'static str {
        "in_memory"
    }
}
