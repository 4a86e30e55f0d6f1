//! Indexed file repository trait

use async_trait::async_trait;

use super::entity::{FileId, IndexedFile};
use crate::domain::DomainError;

/// Repository for tracking uploaded files
#[async_trait]
pub trait IndexedFileRepository: Send + Sync + std::fmt::Debug {
    /// Get a file by ID
    async fn get(&self, id: FileId) -> Result<Option<IndexedFile>, DomainError>;

    /// Store a new file, assigning its ID
    async fn create(&self, file: IndexedFile) -> Result<IndexedFile, DomainError>;

    /// Replace an existing file record
    async fn update(&self, file: IndexedFile) -> Result<IndexedFile, DomainError>;

    /// List every file, newest upload first
    async fn list(&self) -> Result<Vec<IndexedFile>, DomainError>;
}
