//! Boundary-aware overlapping chunker

use crate::domain::ingestion::{ChunkMetadata, ChunkingConfig, DocumentChunk};
use crate::domain::DomainError;

/// Characters that end a sentence
const SENTENCE_TERMINATORS: [char; 3] = ['.', '?', '!'];

/// Splits text into overlapping windows of characters, preferring to cut
/// after a sentence terminator and falling back to the last whitespace
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    /// Create a chunker, rejecting configurations that cannot make progress
    pub fn new(config: ChunkingConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Chunk `text`, tagging every chunk with the file identity
    ///
    /// Offsets are character offsets. Windows that are whitespace only are
    /// skipped and do not consume a chunk id.
    pub fn chunk(&self, text: &str, file_id: i64, filename: &str) -> Vec<DocumentChunk> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let ChunkingConfig {
            chunk_size,
            chunk_overlap,
        } = self.config;

        let mut chunks = Vec::new();
        let mut cursor = 0;

        while cursor < len {
            let window_end = (cursor + chunk_size).min(len);
            let reaches_end = window_end == len;
            let window = &chars[cursor..window_end];

            let window_len = if reaches_end {
                window.len()
            } else {
                boundary_len(window, chunk_size)
            };

            let piece: String = window[..window_len].iter().collect();
            let trimmed = piece.trim();

            if !trimmed.is_empty() {
                let metadata = ChunkMetadata::new(
                    file_id,
                    filename,
                    chunks.len(),
                    cursor,
                    cursor + window_len,
                );
                chunks.push(DocumentChunk::new(trimmed, metadata));
            }

            // The remainder is already covered; stepping back by the overlap
            // would only re-emit a suffix of this window.
            if reaches_end {
                break;
            }

            cursor += window_len.saturating_sub(chunk_overlap).max(1);
        }

        chunks
    }
}

/// Length of the window after cutting at the preferred boundary
fn boundary_len(window: &[char], chunk_size: usize) -> usize {
    let sentence_end = window
        .iter()
        .rposition(|c| SENTENCE_TERMINATORS.contains(c));

    if let Some(idx) = sentence_end {
        if idx * 2 >= chunk_size {
            return idx + 1;
        }
    }

    match window.iter().rposition(|c| c.is_whitespace()) {
        Some(idx) if idx > 0 => idx,
        _ => window.len(),
    }
}

/// Validate `config` and chunk `text` in one step
pub fn chunk_text(
    text: &str,
    config: ChunkingConfig,
    file_id: i64,
    filename: &str,
) -> Result<Vec<DocumentChunk>, DomainError> {
    Ok(TextChunker::new(config)?.chunk(text, file_id, filename))
}
