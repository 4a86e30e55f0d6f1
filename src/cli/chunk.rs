//! Chunk command - previews how a file is split before indexing

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::domain::ingestion::file_extension;
use crate::domain::DomainError;
use crate::infrastructure::ingestion::ParserRegistry;

/// Arguments for the chunk command
#[derive(Args, Clone)]
pub struct ChunkArgs {
    /// File to parse
    pub file: PathBuf,

    /// Chunk size in characters (overrides config)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between chunks in characters (overrides config)
    #[arg(long)]
    pub chunk_overlap: Option<usize>,
}

/// Parse the file and print each chunk with its offsets
pub async fn run(args: ChunkArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let registry = ParserRegistry::new(config.rag.chunking())?;

    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file path: {}", args.file.display()))?;

    let parser = registry
        .get_parser(filename, args.chunk_size, args.chunk_overlap)
        .ok_or_else(|| {
            DomainError::unsupported_file_type(file_extension(filename).unwrap_or_default())
        })?;

    let chunks = parser.parse(&args.file, 0, filename).await?;

    for chunk in &chunks {
        println!(
            "--- chunk {} [{}..{}] {} chars",
            chunk.chunk_id,
            chunk.metadata.start,
            chunk.metadata.end,
            chunk.char_len()
        );
        println!("{}", chunk.text);
    }

    let chunking = parser.chunking_config();
    println!(
        "{} chunks (size {}, overlap {})",
        chunks.len(),
        chunking.chunk_size,
        chunking.chunk_overlap
    );

    Ok(())
}
