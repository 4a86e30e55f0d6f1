//! Document ingestion infrastructure
//!
//! This module provides the chunker, the parser implementations and the
//! extension-keyed registry that selects between them.

pub mod chunker;
pub mod parsers;
pub mod registry;

pub use chunker::{chunk_text, TextChunker};
pub use parsers::{PdfParser, TextParser};
pub use registry::ParserRegistry;
