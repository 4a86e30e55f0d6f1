//! Uploaded file tracking

mod entity;
mod repository;

pub use entity::{FileId, IndexedFile, IndexingStatus};
pub use repository::IndexedFileRepository;
