//! In-memory indexed file repository

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::indexed_file::{FileId, IndexedFile, IndexedFileRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct State {
    next_id: FileId,
    files: BTreeMap<FileId, IndexedFile>,
}

/// In-memory file repository; ids start at 1
#[derive(Debug, Default)]
pub struct InMemoryIndexedFileRepository {
    state: RwLock<State>,
}

impl InMemoryIndexedFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexedFileRepository for InMemoryIndexedFileRepository {
    async fn get(&self, id: FileId) -> Result<Option<IndexedFile>, DomainError> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn create(&self, file: IndexedFile) -> Result<IndexedFile, DomainError> {
        let mut state = self.state.write().await;

        state.next_id += 1;
        let mut file = file;
        file.id = state.next_id;
        state.files.insert(file.id, file.clone());

        Ok(file)
    }

    async fn update(&self, file: IndexedFile) -> Result<IndexedFile, DomainError> {
        let mut state = self.state.write().await;

        match state.files.get_mut(&file.id) {
            Some(existing) => {
                *existing = file.clone();
                Ok(file)
            }
            None => Err(DomainError::not_found(format!(
                "File '{}' not found",
                file.id
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<IndexedFile>, DomainError> {
        let state = self.state.read().await;

        let mut files: Vec<IndexedFile> = state.files.values().cloned().collect();
        files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));

        Ok(files)
    }
}
