//! Domain layer - Core types, traits and errors

pub mod embedding;
pub mod error;
pub mod indexed_file;
pub mod ingestion;
pub mod llm;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use indexed_file::{FileId, IndexedFile, IndexedFileRepository, IndexingStatus};
pub use ingestion::{
    ChunkMetadata, ChunkingConfig, DocumentChunk, DocumentParser, ParserType,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
pub use llm::{
    ChatProvider, ChatRequest, ChatResponse, ChatStream, Message,
    MessageRole, ModelInfo, Sampling, Usage,
};
pub use vector_store::{
    GetResult, MetadataFilter, QueryResult, VectorRecord, VectorStore,
};
