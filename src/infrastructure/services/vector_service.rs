//! Embedding, indexing and retrieval over the vector store

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::domain::vector_store::{record_id, MetadataFilter, VectorRecord, VectorStore};
use crate::domain::{DomainError, EmbeddingProvider};

/// Name reported for the single document collection
pub const COLLECTION_NAME: &str = "documents";

/// Result of indexing a batch of chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddDocumentsResult {
    pub added: usize,
    pub file_id: i64,
}

/// Result of removing a file's chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub deleted: usize,
    pub file_id: i64,
}

/// A retrieved chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub content: String,
    pub metadata: HashMap<String, serde_json::Value>,
    pub distance: Option<f32>,
}

impl SearchResult {
    pub fn filename(&self) -> &str {
        self.metadata
            .get("filename")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
    }

    pub fn chunk_id(&self) -> u64 {
        self.metadata
            .get("chunk_id")
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    }
}

/// Collection statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub total_chunks: usize,
    pub embedding_model: String,
}

/// Service that embeds chunks and queries through the vector store
#[derive(Debug, Clone)]
pub struct VectorService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    embedding_model: String,
}

impl VectorService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            embedding_model: embedding_model.into(),
        }
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Embed every text and store them all in one insertion
    ///
    /// Nothing is written unless every embedding succeeded.
    pub async fn add_documents(
        &self,
        texts: Vec<String>,
        metadatas: Vec<HashMap<String, serde_json::Value>>,
        file_id: i64,
    ) -> Result<AddDocumentsResult, DomainError> {
        if texts.len() != metadatas.len() {
            return Err(DomainError::validation(format!(
                "Got {} texts but {} metadata entries",
                texts.len(),
                metadatas.len()
            )));
        }

        if texts.is_empty() {
            return Ok(AddDocumentsResult { added: 0, file_id });
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            let embedding = self
                .embedder
                .embed(text, &self.embedding_model)
                .await
                .map_err(|e| {
                    error!(
                        provider = self.embedder.provider_name(),
                        file_id = file_id,
                        chunk = index,
                        error = %e,
                        "Embedding failed"
                    );
                    DomainError::embedding(format!("Chunk {} of file {}: {}", index, file_id, e))
                })?;
            embeddings.push(embedding);
        }

        let records: Vec<VectorRecord> = texts
            .into_iter()
            .zip(metadatas)
            .zip(embeddings)
            .enumerate()
            .map(|(index, ((text, mut metadata), embedding))| {
                let chunk_id = metadata
                    .get("chunk_id")
                    .and_then(|v| v.as_u64())
                    .map(|id| id as usize)
                    .unwrap_or(index);
                metadata
                    .entry("file_id".to_string())
                    .or_insert_with(|| serde_json::json!(file_id));

                VectorRecord::new(record_id(file_id, chunk_id, &text), embedding, text, metadata)
            })
            .collect();

        let added = records.len();
        self.store.add(records).await?;

        info!(
            store = self.store.store_name(),
            file_id = file_id,
            added = added,
            "Added chunks to vector store"
        );
        Ok(AddDocumentsResult { added, file_id })
    }

    /// Find the `n_results` chunks nearest to `query`, nearest first
    ///
    /// A non-empty `file_ids` restricts results to those files.
    pub async fn search(
        &self,
        query: &str,
        n_results: usize,
        file_ids: Option<&[i64]>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if n_results == 0 {
            return Err(DomainError::validation("n_results must be at least 1"));
        }

        let embedding = self
            .embedder
            .embed(query, &self.embedding_model)
            .await
            .map_err(|e| DomainError::retrieval(format!("Failed to embed query: {}", e)))?;

        let filter = file_ids
            .filter(|ids| !ids.is_empty())
            .map(|ids| MetadataFilter::file_ids(ids.iter().copied()));

        let result = self
            .store
            .query(&embedding, n_results, filter.as_ref())
            .await
            .map_err(|e| DomainError::retrieval(e.to_string()))?;

        let results: Vec<SearchResult> = result
            .documents
            .into_iter()
            .zip(result.metadatas)
            .zip(result.distances)
            .map(|((content, metadata), distance)| SearchResult {
                content,
                metadata,
                distance: Some(distance),
            })
            .collect();

        let preview: String = query.chars().take(50).collect();
        info!(query = %preview, results = results.len(), "Vector search completed");

        Ok(results)
    }

    /// Remove every chunk stored for `file_id`
    pub async fn delete_file_chunks(&self, file_id: i64) -> Result<DeleteResult, DomainError> {
        let found = self.store.get(&MetadataFilter::file_id(file_id)).await?;

        if found.ids.is_empty() {
            debug!(file_id = file_id, "No chunks found for file");
            return Ok(DeleteResult { deleted: 0, file_id });
        }

        let deleted = self.store.delete(&found.ids).await?;
        info!(file_id = file_id, deleted = deleted, "Deleted file chunks");

        Ok(DeleteResult { deleted, file_id })
    }

    pub async fn collection_stats(&self) -> Result<CollectionStats, DomainError> {
        Ok(CollectionStats {
            collection_name: COLLECTION_NAME.to_string(),
            total_chunks: self.store.count().await?,
            embedding_model: self.embedding_model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::ingestion::{into_texts_and_metadatas, ChunkMetadata, DocumentChunk};
    use crate::domain::vector_store::FailingVectorStore;
    use crate::infrastructure::vector_store::InMemoryVectorStore;

    fn chunks(file_id: i64, filename: &str, texts: &[&str]) -> Vec<DocumentChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                DocumentChunk::new(*text, ChunkMetadata::new(file_id, filename, i, 0, text.len()))
            })
            .collect()
    }

    fn service_with(
        embedder: MockEmbeddingProvider,
    ) -> (VectorService, Arc<InMemoryVectorStore>) {
        let store = Arc::new(InMemoryVectorStore::new());
        let service = VectorService::new(Arc::new(embedder), store.clone(), "mock-embed");
        (service, store)
    }

    async fn index(service: &VectorService, file_id: i64, texts: &[&str]) -> AddDocumentsResult {
        let (texts, metadatas) =
            into_texts_and_metadatas(chunks(file_id, &format!("{}.txt", file_id), texts));
        service.add_documents(texts, metadatas, file_id).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_documents() {
        let (service, store) = service_with(MockEmbeddingProvider::new());

        let result = index(&service, 1, &["alpha", "beta", "gamma"]).await;

        assert_eq!(result, AddDocumentsResult { added: 3, file_id: 1 });
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_add_documents_length_mismatch() {
        let (service, _) = service_with(MockEmbeddingProvider::new());

        let result = service
            .add_documents(vec!["a".to_string()], vec![], 1)
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_embedding_failure_inserts_nothing() {
        let embedder = MockEmbeddingProvider::new().failing_on_call(2);
        let (service, store) = service_with(embedder);

        let (texts, metadatas) =
            into_texts_and_metadatas(chunks(1, "a.txt", &["one", "two", "three"]));
        let result = service.add_documents(texts, metadatas, 1).await;

        assert!(matches!(result, Err(DomainError::Embedding { .. })));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reindex_is_idempotent() {
        let (service, store) = service_with(MockEmbeddingProvider::new());

        index(&service, 4, &["same text", "other text"]).await;
        let first = store.get(&MetadataFilter::file_id(4)).await.unwrap().ids;

        index(&service, 4, &["same text", "other text"]).await;
        let second = store.get(&MetadataFilter::file_id(4)).await.unwrap().ids;

        assert_eq!(first, second);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_empty_collection() {
        let (service, _) = service_with(MockEmbeddingProvider::new());

        let results = service.search("anything", 5, None).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_orders_nearest_first() {
        let (service, _) = service_with(MockEmbeddingProvider::new());
        index(&service, 1, &["zzz zzz zzz", "apple banana", "xyz qqq"]).await;

        let results = service.search("banana apple", 3, None).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].content, "apple banana");
        assert_eq!(results[0].filename(), "1.txt");
        assert_eq!(results[0].chunk_id(), 1);
        let distances: Vec<f32> = results.iter().map(|r| r.distance.unwrap()).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_search_respects_n_results() {
        let (service, _) = service_with(MockEmbeddingProvider::new());
        index(&service, 1, &["a", "b", "c", "d"]).await;

        assert_eq!(service.search("a", 2, None).await.unwrap().len(), 2);
        assert!(matches!(
            service.search("a", 0, None).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_filter_never_leaks() {
        let (service, _) = service_with(MockEmbeddingProvider::new());
        index(&service, 1, &["shared words here", "more shared words"]).await;
        index(&service, 2, &["shared words here", "different content"]).await;
        index(&service, 3, &["shared words there"]).await;

        let results = service
            .search("shared words", 10, Some(&[1, 3]))
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        for result in &results {
            let file_id = result.metadata["file_id"].as_i64().unwrap();
            assert!(file_id == 1 || file_id == 3);
        }

        let unfiltered = service.search("shared words", 10, Some(&[])).await.unwrap();
        assert_eq!(unfiltered.len(), 5);
    }

    #[tokio::test]
    async fn test_search_embedding_failure_is_retrieval_error() {
        let (service, _) = service_with(MockEmbeddingProvider::new().with_error("down"));

        let result = service.search("query", 5, None).await;

        assert!(matches!(result, Err(DomainError::Retrieval { .. })));
    }

    #[tokio::test]
    async fn test_search_store_failure_is_not_empty_result() {
        let service = VectorService::new(
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(FailingVectorStore::new("disk gone")),
            "mock-embed",
        );

        let result = service.search("query", 5, None).await;

        assert!(matches!(result, Err(DomainError::Retrieval { .. })));
    }

    #[tokio::test]
    async fn test_delete_file_chunks() {
        let (service, store) = service_with(MockEmbeddingProvider::new());
        index(&service, 7, &["one", "two", "three"]).await;
        index(&service, 8, &["keep"]).await;

        let first = service.delete_file_chunks(7).await.unwrap();
        let second = service.delete_file_chunks(7).await.unwrap();

        assert_eq!(first.deleted, 3);
        assert_eq!(second.deleted, 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_id_metadata_is_filled_in() {
        let (service, store) = service_with(MockEmbeddingProvider::new());

        service
            .add_documents(vec!["loose text".to_string()], vec![HashMap::new()], 12)
            .await
            .unwrap();

        let found = store.get(&MetadataFilter::file_id(12)).await.unwrap();
        assert_eq!(found.ids, vec![record_id(12, 0, "loose text")]);
    }

    #[tokio::test]
    async fn test_collection_stats() {
        let (service, _) = service_with(MockEmbeddingProvider::new());
        index(&service, 1, &["a", "b"]).await;

        let stats = service.collection_stats().await.unwrap();

        assert_eq!(stats.collection_name, "documents");
        assert_eq!(stats.total_chunks, 2);
        assert_eq!(stats.embedding_model, "mock-embed");
    }
}
