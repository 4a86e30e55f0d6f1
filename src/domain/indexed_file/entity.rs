//! Indexed file entity and related types

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the file repository
pub type FileId = i64;

/// Indexing lifecycle of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexingStatus {
    /// Stored, not indexed yet
    #[default]
    Pending,
    /// Every chunk is in the vector store
    Indexed,
    /// Parsing or embedding failed
    Failed,
    /// File and vectors removed
    Deleted,
}

impl std::fmt::Display for IndexingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Indexed => write!(f, "indexed"),
            Self::Failed => write!(f, "failed"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// An uploaded file tracked by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedFile {
    pub id: FileId,
    pub filename: String,
    pub file_path: PathBuf,
    /// Lower-cased extension with its dot
    pub file_type: String,
    pub file_size: u64,
    /// Hex SHA-256 of the stored bytes
    pub file_hash: String,
    pub status: IndexingStatus,
    pub chunk_count: usize,
    pub error_message: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub indexed_at: Option<DateTime<Utc>>,
}

impl IndexedFile {
    /// Create a pending record; the repository assigns the id on create
    pub fn new(
        filename: impl Into<String>,
        file_path: impl Into<PathBuf>,
        file_type: impl Into<String>,
        file_size: u64,
        file_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            filename: filename.into(),
            file_path: file_path.into(),
            file_type: file_type.into(),
            file_size,
            file_hash: file_hash.into(),
            status: IndexingStatus::Pending,
            chunk_count: 0,
            error_message: None,
            uploaded_at: Utc::now(),
            indexed_at: None,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.status == IndexingStatus::Indexed
    }

    pub fn mark_indexed(&mut self, chunk_count: usize) {
        self.status = IndexingStatus::Indexed;
        self.chunk_count = chunk_count;
        self.error_message = None;
        self.indexed_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = IndexingStatus::Failed;
        self.chunk_count = 0;
        self.error_message = Some(error.into());
        self.indexed_at = None;
    }

    pub fn mark_deleted(&mut self) {
        self.status = IndexingStatus::Deleted;
        self.chunk_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexedFile {
        IndexedFile::new("notes.md", "./uploads/notes.md", ".md", 42, "ab12")
    }

    #[test]
    fn test_new_file_is_pending() {
        let file = sample();

        assert_eq!(file.status, IndexingStatus::Pending);
        assert!(!file.is_indexed());
        assert_eq!(file.chunk_count, 0);
        assert!(file.indexed_at.is_none());
    }

    #[test]
    fn test_status_transitions() {
        let mut file = sample();

        file.mark_indexed(3);
        assert!(file.is_indexed());
        assert_eq!(file.chunk_count, 3);
        assert!(file.indexed_at.is_some());

        file.mark_failed("embedding daemon unreachable");
        assert_eq!(file.status, IndexingStatus::Failed);
        assert!(!file.is_indexed());
        assert_eq!(
            file.error_message.as_deref(),
            Some("embedding daemon unreachable")
        );

        file.mark_deleted();
        assert_eq!(file.status, IndexingStatus::Deleted);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(IndexingStatus::Pending.to_string(), "pending");
        assert_eq!(IndexingStatus::Deleted.to_string(), "deleted");
        assert_eq!(
            serde_json::to_string(&IndexingStatus::Indexed).unwrap(),
            "\"indexed\""
        );
    }
}
