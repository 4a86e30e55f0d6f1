//! Extension-keyed parser selection

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ingestion::{
    detect_parser_from_filename, file_extension, ChunkingConfig, DocumentParser, ParserType,
    PARSER_TABLE,
};
use crate::domain::DomainError;

use super::parsers::{PdfParser, TextParser};

/// Registry that maps filenames to parsers
///
/// Chunk sizes omitted by the caller fall back to the defaults the registry
/// was built with.
#[derive(Debug, Clone, Copy)]
pub struct ParserRegistry {
    defaults: ChunkingConfig,
}

impl ParserRegistry {
    /// Create a registry with validated default chunking parameters
    pub fn new(defaults: ChunkingConfig) -> Result<Self, DomainError> {
        defaults.validate()?;
        Ok(Self { defaults })
    }

    pub fn defaults(&self) -> ChunkingConfig {
        self.defaults
    }

    /// Check whether the filename's extension has a parser
    pub fn is_supported(&self, filename: &str) -> bool {
        detect_parser_from_filename(filename).is_some()
    }

    /// Create the parser for `filename`, or `None` for unsupported types
    pub fn get_parser(
        &self,
        filename: &str,
        chunk_size: Option<usize>,
        chunk_overlap: Option<usize>,
    ) -> Option<Arc<dyn DocumentParser>> {
        let Some(parser_type) = detect_parser_from_filename(filename) else {
            warn!(
                filename = filename,
                extension = file_extension(filename).as_deref().unwrap_or(""),
                "No parser available for file type"
            );
            return None;
        };

        let config = ChunkingConfig::new(
            chunk_size.unwrap_or(self.defaults.chunk_size),
            chunk_overlap.unwrap_or(self.defaults.chunk_overlap),
        );

        debug!(
            filename = filename,
            parser = parser_type.name(),
            chunk_size = config.chunk_size,
            chunk_overlap = config.chunk_overlap,
            "Selected parser"
        );

        Some(Self::create(parser_type, config))
    }

    /// Create a parser of the given type
    pub fn create(parser_type: ParserType, config: ChunkingConfig) -> Arc<dyn DocumentParser> {
        match parser_type {
            ParserType::PlainText => Arc::new(TextParser::new(config)),
            ParserType::Pdf => Arc::new(PdfParser::new(config)),
        }
    }

    /// Every supported extension, lower-cased with its dot
    pub fn supported_extensions(&self) -> BTreeSet<&'static str> {
        PARSER_TABLE.iter().map(|(ext, _)| *ext).collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self {
            defaults: ChunkingConfig::default(),
        }
    }
}
