//! Ask command - answers a question from indexed files

use std::io::Write;
use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use futures::StreamExt;

use crate::infrastructure::services::{ContextChatRequest, SearchResult};

/// Arguments for the ask command
#[derive(Args, Clone)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// Files to index before answering
    #[arg(long = "file", short = 'f', required = true)]
    pub files: Vec<PathBuf>,

    /// Chat model (overrides config)
    #[arg(long)]
    pub model: Option<String>,

    /// Number of chunks to retrieve (overrides config)
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Upper bound on generated tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print the answer as it is generated
    #[arg(long)]
    pub stream: bool,
}

/// Index the files, retrieve context and answer through the chat backend
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let service = super::build_rag_service(&config)?;

    if !service.health_check().await {
        bail!("Backend at {} is not reachable", config.ollama.base_url);
    }

    let file_ids = super::index_files(&service, &args.files).await?;

    let mut request = ContextChatRequest::new(args.question).with_file_ids(file_ids);
    if let Some(model) = args.model {
        request = request.with_model(model);
    }
    if let Some(top_k) = args.top_k {
        request = request.with_top_k(top_k);
    }
    if let Some(temperature) = args.temperature {
        request = request.with_temperature(temperature);
    }
    if let Some(top_p) = args.top_p {
        request = request.with_top_p(top_p);
    }
    if let Some(max_tokens) = args.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }

    let sources = if args.stream {
        let answer = service.chat_with_context_stream(request).await?;
        let mut stream = answer.stream;
        let mut stdout = std::io::stdout();

        while let Some(fragment) = stream.next().await {
            write!(stdout, "{}", fragment?)?;
            stdout.flush()?;
        }
        writeln!(stdout)?;

        answer.sources
    } else {
        let answer = service.chat_with_context(request).await?;
        println!("{}", answer.response.content());

        answer.sources
    };

    print_sources(&sources);

    Ok(())
}

fn print_sources(sources: &[SearchResult]) {
    if sources.is_empty() {
        return;
    }

    println!("\nSources:");
    for source in sources {
        println!("  [{}#{}]", source.filename(), source.chunk_id());
    }
}
