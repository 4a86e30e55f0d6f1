use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::ingestion::{ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::infrastructure::llm::DEFAULT_OLLAMA_BASE_URL;
use crate::infrastructure::services::RagServiceConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ollama: OllamaConfig,
    pub rag: RagConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub default_model: String,
    pub embedding_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_upload_size_mb: u64,
    pub top_k_results: usize,
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            default_model: "llama3.2:3b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            max_upload_size_mb: 50,
            top_k_results: 5,
            upload_dir: PathBuf::from("./uploads"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl RagConfig {
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Settings for the RAG service derived from the `ollama` and `rag` sections
    pub fn rag_service(&self) -> RagServiceConfig {
        RagServiceConfig {
            upload_dir: self.rag.upload_dir.clone(),
            max_upload_size: self.rag.max_upload_size_bytes(),
            top_k: self.rag.top_k_results,
            chat_model: self.ollama.default_model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.ollama.embedding_model, "nomic-embed-text");
        assert_eq!(config.rag.chunking(), ChunkingConfig::new(512, 50));
        assert_eq!(config.rag.max_upload_size_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[rag]\nchunk_size = 256\n\n[logging]\nformat = \"json\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.rag.chunk_size, 256);
        assert_eq!(config.rag.chunk_overlap, 50);
        assert_eq!(config.rag.top_k_results, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.ollama.default_model, "llama3.2:3b");
    }

    #[test]
    fn test_rag_service_config() {
        let mut config = AppConfig::default();
        config.rag.max_upload_size_mb = 2;
        config.ollama.default_model = "mistral".to_string();

        let service = config.rag_service();

        assert_eq!(service.max_upload_size, 2 * 1024 * 1024);
        assert_eq!(service.chat_model, "mistral");
        assert_eq!(service.top_k, 5);
    }
}
