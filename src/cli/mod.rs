//! CLI module for the local LLM dashboard
//!
//! Provides subcommands that drive the ingestion and retrieval core:
//! - `extensions`: list supported file types
//! - `chunk`: preview how a file is chunked
//! - `search`: index files and run a similarity search
//! - `ask`: index files and answer a question from them
//! - `models`: list models installed on the backend

pub mod ask;
pub mod chunk;
pub mod extensions;
pub mod models;
pub mod search;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::indexed_file::FileId;
use crate::infrastructure::embedding::OllamaEmbeddingProvider;
use crate::infrastructure::indexed_file::InMemoryIndexedFileRepository;
use crate::infrastructure::ingestion::ParserRegistry;
use crate::infrastructure::llm::{HttpClient, OllamaChatProvider};
use crate::infrastructure::logging;
use crate::infrastructure::services::{RagService, VectorService};
use crate::infrastructure::vector_store::InMemoryVectorStore;

/// Local LLM dashboard - document ingestion and retrieval for RAG
#[derive(Parser)]
#[command(name = "local-llm-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported file extensions and their parsers
    Extensions,

    /// Parse a file and print its chunks
    Chunk(chunk::ChunkArgs),

    /// Index files and print the chunks nearest to a query
    Search(search::SearchArgs),

    /// Index files and answer a question from them
    Ask(ask::AskArgs),

    /// List models installed on the backend
    Models,
}

/// Load `.env` and configuration, then install logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    config
}

/// Wire the Ollama backends, in-process stores and registry into a service
pub(crate) fn build_rag_service(config: &AppConfig) -> anyhow::Result<RagService> {
    let timeout = Duration::from_secs(config.ollama.timeout_secs);
    let registry = ParserRegistry::new(config.rag.chunking())?;

    let embedder = OllamaEmbeddingProvider::with_base_url(
        HttpClient::with_timeout(timeout)?,
        &config.ollama.base_url,
    );
    let chat = OllamaChatProvider::with_base_url(
        HttpClient::with_timeout(timeout)?,
        &config.ollama.base_url,
    );

    let vectors = VectorService::new(
        Arc::new(embedder),
        Arc::new(InMemoryVectorStore::new()),
        &config.ollama.embedding_model,
    );

    Ok(RagService::new(
        registry,
        vectors,
        Arc::new(InMemoryIndexedFileRepository::new()),
        Arc::new(chat),
        config.rag_service(),
    ))
}

/// Upload every path through the service, returning the assigned ids
pub(crate) async fn index_files(
    service: &RagService,
    paths: &[PathBuf],
) -> anyhow::Result<Vec<FileId>> {
    let mut ids = Vec::with_capacity(paths.len());

    for path in paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Invalid file path: {}", path.display()))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file = service
            .upload(filename, &bytes)
            .await
            .with_context(|| format!("Failed to index {}", path.display()))?;

        info!(
            file_id = file.id,
            filename = %file.filename,
            chunks = file.chunk_count,
            "File ready"
        );
        ids.push(file.id);
    }

    Ok(ids)
}
