//! Search command - indexes files and prints the nearest chunks

use std::path::PathBuf;

use clap::Args;

/// Arguments for the search command
#[derive(Args, Clone)]
pub struct SearchArgs {
    /// Text to search for
    pub query: String,

    /// Files to index before searching
    #[arg(long = "file", short = 'f', required = true)]
    pub files: Vec<PathBuf>,

    /// Number of results (overrides config)
    #[arg(long, short = 'n')]
    pub n_results: Option<usize>,
}

/// Index the files into an in-process store and run the query against them
pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let service = super::build_rag_service(&config)?;

    let file_ids = super::index_files(&service, &args.files).await?;
    let results = service.search(&args.query, args.n_results, &file_ids).await?;

    if results.is_empty() {
        println!("No matching chunks");
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        println!(
            "{}. [{}#{}] distance {:.4}",
            rank + 1,
            result.filename(),
            result.chunk_id(),
            result.distance.unwrap_or(f32::NAN)
        );
        println!("{}\n", result.content);
    }

    Ok(())
}
