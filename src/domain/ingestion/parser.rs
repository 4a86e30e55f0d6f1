//! Document parser trait and types

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::chunker::{ChunkingConfig, DocumentChunk};
use crate::domain::DomainError;

/// Type of document parser to use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParserType {
    /// Any text-based format: prose, markup, source code, config files
    PlainText,
    /// Paged PDF documents
    Pdf,
}

impl ParserType {
    /// Get the parser name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Pdf => "pdf",
        }
    }
}

/// Trait for document parsers
///
/// A parser extracts the raw text of a stored file and hands it to the
/// chunker configured at construction, so every format is chunked the same
/// way.
#[async_trait]
pub trait DocumentParser: Send + Sync + Debug {
    /// Get the parser type
    fn parser_type(&self) -> ParserType;

    /// Get the chunking configuration this parser was built with
    fn chunking_config(&self) -> ChunkingConfig;

    /// Parse the file at `path` into chunks tagged with the file identity
    async fn parse(
        &self,
        path: &Path,
        file_id: i64,
        filename: &str,
    ) -> Result<Vec<DocumentChunk>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_type_names() {
        assert_eq!(ParserType::PlainText.name(), "text");
        assert_eq!(ParserType::Pdf.name(), "pdf");
    }

    #[test]
    fn test_parser_type_serialization() {
        let json = serde_json::to_string(&ParserType::PlainText).unwrap();
        assert_eq!(json, "\"plain_text\"");
    }
}
