//! Vector store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::filter::MetadataFilter;
use super::record::{GetResult, QueryResult, VectorRecord};
use crate::domain::DomainError;

/// Trait for vector store backends
///
/// Distances are cosine distances: lower means closer.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Insert records; an existing id is overwritten
    async fn add(&self, records: Vec<VectorRecord>) -> Result<(), DomainError>;

    /// Return the `n_results` nearest records, optionally restricted by a
    /// metadata filter
    async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<QueryResult, DomainError>;

    /// Return every record matching the filter
    async fn get(&self, filter: &MetadataFilter) -> Result<GetResult, DomainError>;

    /// Delete records by id, returning how many existed
    async fn delete(&self, ids: &[String]) -> Result<usize, DomainError>;

    /// Total number of stored records
    async fn count(&self) -> Result<usize, DomainError>;

    /// Backend name used in logs
    fn store_name(&self) -> &'static str;
}
