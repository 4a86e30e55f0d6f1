//! Plain text document parser

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ingestion::{ChunkingConfig, DocumentChunk, DocumentParser, ParserType};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::chunker::chunk_text;

/// Parser for any text-based file: prose, markup, source code, config
#[derive(Debug, Clone, Default)]
pub struct TextParser {
    config: ChunkingConfig,
}

impl TextParser {
    /// Create a new text parser
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of failing
pub fn decode_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[async_trait]
impl DocumentParser for TextParser {
    fn parser_type(&self) -> ParserType {
        ParserType::PlainText
    }

    fn chunking_config(&self) -> ChunkingConfig {
        self.config
    }

    async fn parse(
        &self,
        path: &Path,
        file_id: i64,
        filename: &str,
    ) -> Result<Vec<DocumentChunk>, DomainError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::parse(filename, format!("Failed to read file: {}", e)))?;

        let text = decode_lossy(&bytes);
        let chunks = chunk_text(&text, self.config, file_id, filename)?;

        debug!(
            filename = filename,
            chars = text.chars().count(),
            chunks = chunks.len(),
            "Parsed text file"
        );

        Ok(chunks)
    }
}
