//! Models command - lists models installed on the backend

use anyhow::bail;

/// Print the installed models, failing when the backend is unreachable
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();
    let service = super::build_rag_service(&config)?;

    if !service.health_check().await {
        bail!("Backend at {} is not reachable", config.ollama.base_url);
    }

    for model in service.list_models().await? {
        match model.size {
            Some(size) => println!("{:<32} {:>8.1} MB", model.name, size as f64 / 1_048_576.0),
            None => println!("{}", model.name),
        }
    }

    Ok(())
}
