//! Infrastructure services

mod rag_service;
mod vector_service;

pub use rag_service::{
    build_context_prompt, ContextChatRequest, ContextualAnswer, ContextualStream, RagService,
    RagServiceConfig, RagStats,
};
pub use vector_service::{
    AddDocumentsResult, CollectionStats, DeleteResult, SearchResult, VectorService,
    COLLECTION_NAME,
};
