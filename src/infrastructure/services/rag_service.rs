//! Upload, indexing and retrieval-augmented chat over uploaded files

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::domain::indexed_file::{FileId, IndexedFile, IndexedFileRepository, IndexingStatus};
use crate::domain::ingestion::{
    file_extension, into_texts_and_metadatas, validate_filename, validate_upload_size,
    DocumentParser,
};
use crate::domain::llm::{ChatProvider, ChatRequest, ChatResponse, ChatStream, Message, ModelInfo};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::ParserRegistry;

use super::vector_service::{CollectionStats, DeleteResult, SearchResult, VectorService};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Settings for the RAG service
#[derive(Debug, Clone)]
pub struct RagServiceConfig {
    /// Directory uploaded files are written to
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes
    pub max_upload_size: u64,
    /// Chunks retrieved per question when the caller does not say
    pub top_k: usize,
    /// Chat model used when the caller does not name one
    pub chat_model: String,
}

impl Default for RagServiceConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            max_upload_size: 50 * 1024 * 1024,
            top_k: 5,
            chat_model: "llama3.2:3b".to_string(),
        }
    }
}

/// Dashboard statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagStats {
    pub total_files: usize,
    pub indexed_files: usize,
    pub total_size_mb: f64,
    pub vector_store: CollectionStats,
    pub supported_formats: Vec<String>,
}

/// A question to answer from the indexed files
#[derive(Debug, Clone, Default)]
pub struct ContextChatRequest {
    pub question: String,
    /// Earlier turns of the conversation, oldest first
    pub history: Vec<Message>,
    /// Restrict retrieval to these files; empty means all files
    pub file_ids: Vec<FileId>,
    pub model: Option<String>,
    pub top_k: Option<usize>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ContextChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    pub fn with_file_ids(mut self, file_ids: Vec<FileId>) -> Self {
        self.file_ids = file_ids;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A complete answer together with the chunks it was grounded on
#[derive(Debug, Clone)]
pub struct ContextualAnswer {
    pub response: ChatResponse,
    pub sources: Vec<SearchResult>,
}

/// A streamed answer together with the chunks it was grounded on
pub struct ContextualStream {
    pub stream: ChatStream,
    pub sources: Vec<SearchResult>,
}

impl fmt::Debug for ContextualStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextualStream")
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

/// Render retrieved chunks into a system prompt with `[filename#chunk]` tags
pub fn build_context_prompt(sources: &[SearchResult]) -> String {
    let mut prompt = String::from(
        "Answer the user's question using the document excerpts below. \
         Cite the excerpts you rely on by their tag, for example [notes.md#0]. \
         If the excerpts do not contain the answer, say so.",
    );

    for source in sources {
        prompt.push_str(&format!(
            "\n\n[{}#{}]\n{}",
            source.filename(),
            source.chunk_id(),
            source.content
        ));
    }

    prompt
}

/// Service tying the upload boundary, the indexing pipeline and chat together
#[derive(Debug, Clone)]
pub struct RagService {
    registry: ParserRegistry,
    vectors: VectorService,
    files: Arc<dyn IndexedFileRepository>,
    chat: Arc<dyn ChatProvider>,
    config: RagServiceConfig,
}

impl RagService {
    pub fn new(
        registry: ParserRegistry,
        vectors: VectorService,
        files: Arc<dyn IndexedFileRepository>,
        chat: Arc<dyn ChatProvider>,
        config: RagServiceConfig,
    ) -> Self {
        Self {
            registry,
            vectors,
            files,
            chat,
            config,
        }
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RagServiceConfig {
        &self.config
    }

    /// Whether the chat backend answers
    pub async fn health_check(&self) -> bool {
        self.chat.health_check().await
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
        self.chat.list_models().await
    }

    /// Store and index an uploaded file with the default chunking parameters
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<IndexedFile, DomainError> {
        self.upload_with_chunking(filename, bytes, None, None).await
    }

    /// Store and index an uploaded file
    ///
    /// Size, name and type are checked before anything is written. Once the
    /// file record exists, any failure leaves it marked `Failed`.
    pub async fn upload_with_chunking(
        &self,
        filename: &str,
        bytes: &[u8],
        chunk_size: Option<usize>,
        chunk_overlap: Option<usize>,
    ) -> Result<IndexedFile, DomainError> {
        let size = bytes.len() as u64;
        validate_upload_size(size, self.config.max_upload_size)?;
        validate_filename(filename)?;

        let file_type = file_extension(filename).unwrap_or_default();
        let parser = self
            .registry
            .get_parser(filename, chunk_size, chunk_overlap)
            .ok_or_else(|| DomainError::unsupported_file_type(file_type.clone()))?;
        parser.chunking_config().validate()?;

        let hash = hex::encode(Sha256::digest(bytes));
        let mut file = self
            .files
            .create(IndexedFile::new(filename, PathBuf::new(), file_type, size, hash))
            .await?;

        let outcome = match self.store(&mut file, bytes).await {
            Ok(()) => self.index(parser.as_ref(), &file).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(chunk_count) => {
                file.mark_indexed(chunk_count);
                let file = self.files.update(file).await?;
                info!(
                    file_id = file.id,
                    filename = %file.filename,
                    chunks = chunk_count,
                    "Indexed uploaded file"
                );
                Ok(file)
            }
            Err(e) => {
                error!(file_id = file.id, filename = %file.filename, error = %e, "Indexing failed");
                file.mark_failed(e.to_string());
                if let Err(update_err) = self.files.update(file).await {
                    error!(error = %update_err, "Failed to record indexing failure");
                }
                Err(e)
            }
        }
    }

    /// Write the bytes under `upload_dir` as `{id}_{filename}` and persist the path
    async fn store(&self, file: &mut IndexedFile, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self
            .config
            .upload_dir
            .join(format!("{}_{}", file.id, file.filename));

        tokio::fs::create_dir_all(&self.config.upload_dir)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            DomainError::storage(format!("Failed to write '{}': {}", path.display(), e))
        })?;

        file.file_path = path;
        *file = self.files.update(file.clone()).await?;

        Ok(())
    }

    async fn index(
        &self,
        parser: &dyn DocumentParser,
        file: &IndexedFile,
    ) -> Result<usize, DomainError> {
        let chunks = parser.parse(&file.file_path, file.id, &file.filename).await?;

        if chunks.is_empty() {
            return Err(DomainError::parse(
                &file.filename,
                "No text could be extracted",
            ));
        }

        let (texts, metadatas) = into_texts_and_metadatas(chunks);
        let result = self.vectors.add_documents(texts, metadatas, file.id).await?;

        Ok(result.added)
    }

    pub async fn get_file(&self, id: FileId) -> Result<IndexedFile, DomainError> {
        self.files
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("File '{}' not found", id)))
    }

    /// Files that have not been deleted, newest first
    pub async fn list_files(&self) -> Result<Vec<IndexedFile>, DomainError> {
        let files = self.files.list().await?;

        Ok(files
            .into_iter()
            .filter(|f| f.status != IndexingStatus::Deleted)
            .collect())
    }

    /// Remove a file's vectors, its stored bytes and mark the record deleted
    pub async fn delete_file(&self, id: FileId) -> Result<DeleteResult, DomainError> {
        let mut file = self.get_file(id).await?;
        if file.status == IndexingStatus::Deleted {
            return Err(DomainError::not_found(format!("File '{}' not found", id)));
        }

        let result = self.vectors.delete_file_chunks(id).await?;

        match tokio::fs::remove_file(&file.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(file_id = id, path = %file.file_path.display(), "Stored file already gone");
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to remove '{}': {}",
                    file.file_path.display(),
                    e
                )));
            }
        }

        file.mark_deleted();
        self.files.update(file).await?;

        info!(file_id = id, chunks = result.deleted, "Deleted file");
        Ok(result)
    }

    pub async fn stats(&self) -> Result<RagStats, DomainError> {
        let files = self.list_files().await?;

        let total_bytes: u64 = files.iter().map(|f| f.file_size).sum();
        let total_size_mb = (total_bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0;

        Ok(RagStats {
            total_files: files.len(),
            indexed_files: files.iter().filter(|f| f.is_indexed()).count(),
            total_size_mb,
            vector_store: self.vectors.collection_stats().await?,
            supported_formats: self
                .registry
                .supported_extensions()
                .into_iter()
                .map(String::from)
                .collect(),
        })
    }

    pub async fn search(
        &self,
        query: &str,
        n_results: Option<usize>,
        file_ids: &[FileId],
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.vectors
            .search(query, n_results.unwrap_or(self.config.top_k), Some(file_ids))
            .await
    }

    /// Answer a question from the retrieved chunks
    pub async fn chat_with_context(
        &self,
        request: ContextChatRequest,
    ) -> Result<ContextualAnswer, DomainError> {
        let (model, chat_request, sources) = self.prepare(request).await?;
        let response = self.chat.chat(&model, chat_request).await?;

        Ok(ContextualAnswer { response, sources })
    }

    /// Stream an answer to a question from the retrieved chunks
    pub async fn chat_with_context_stream(
        &self,
        request: ContextChatRequest,
    ) -> Result<ContextualStream, DomainError> {
        let (model, chat_request, sources) = self.prepare(request).await?;
        let stream = self.chat.chat_stream(&model, chat_request).await?;

        Ok(ContextualStream { stream, sources })
    }

    async fn prepare(
        &self,
        request: ContextChatRequest,
    ) -> Result<(String, ChatRequest, Vec<SearchResult>), DomainError> {
        if request.question.trim().is_empty() {
            return Err(DomainError::validation("Question cannot be empty"));
        }

        let sources = self
            .search(&request.question, request.top_k, &request.file_ids)
            .await?;

        let mut chat = ChatRequest::default();
        if !sources.is_empty() {
            chat = chat.system(build_context_prompt(&sources));
        }
        for message in request.history {
            chat = chat.push(message);
        }
        chat = chat.user(request.question);
        if let Some(temperature) = request.temperature {
            chat = chat.with_temperature(temperature);
        }
        if let Some(top_p) = request.top_p {
            chat = chat.with_top_p(top_p);
        }
        if let Some(max_tokens) = request.max_tokens {
            chat = chat.with_max_tokens(max_tokens);
        }

        let model = request
            .model
            .unwrap_or_else(|| self.config.chat_model.clone());

        Ok((model, chat, sources))
    }
}
