use clap::Parser;
use local_llm_dashboard::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extensions => cli::extensions::run(),
        Command::Chunk(args) => cli::chunk::run(args).await,
        Command::Search(args) => cli::search::run(args).await,
        Command::Ask(args) => cli::ask::run(args).await,
        Command::Models => cli::models::run().await,
    }
}
