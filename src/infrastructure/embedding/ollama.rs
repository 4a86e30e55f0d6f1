//! Ollama embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::llm::{HttpClientTrait, DEFAULT_OLLAMA_BASE_URL};

/// Ollama embedding provider
#[derive(Debug)]
pub struct OllamaEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> OllamaEmbeddingProvider<C> {
    /// Create a new Ollama embedding provider
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }

    fn build_request(&self, text: &str, model: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "prompt": text,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<f32>, DomainError> {
        let response: OllamaEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("ollama", format!("Failed to parse embedding response: {}", e))
        })?;

        if response.embedding.is_empty() {
            return Err(DomainError::provider(
                "ollama",
                "Embedding response contained no values",
            ));
        }

        Ok(response.embedding)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OllamaEmbeddingProvider<C> {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, DomainError> {
        let body = self.build_request(text, model);

        let response = self.client.post_json(&self.embeddings_url(), &body).await?;

        let embedding = self.parse_response(response)?;
        debug!(model = model, dimension = embedding.len(), "Generated embedding");

        Ok(embedding)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::MockHttpClient;

    const TEST_URL: &str = "http://localhost:11434/api/embeddings";

    #[tokio::test]
    async fn test_ollama_embedding() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({ "embedding": [0.1, 0.2, 0.3] }),
        );

        let provider = OllamaEmbeddingProvider::new(client);
        let embedding = provider
            .embed("Hello, world!", "nomic-embed-text")
            .await
            .unwrap();

        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_ollama_embedding_request_body() {
        let client = MockHttpClient::new()
            .with_response(TEST_URL, serde_json::json!({ "embedding": [1.0] }));

        let provider = OllamaEmbeddingProvider::new(client);
        provider.embed("chunk text", "nomic-embed-text").await.unwrap();

        let bodies = provider.client.posted_bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].0, TEST_URL);
        assert_eq!(
            bodies[0].1,
            serde_json::json!({ "model": "nomic-embed-text", "prompt": "chunk text" })
        );
    }

    #[tokio::test]
    async fn test_ollama_embedding_empty_vector_is_error() {
        let client = MockHttpClient::new().with_response(TEST_URL, serde_json::json!({}));

        let provider = OllamaEmbeddingProvider::new(client);
        let result = provider.embed("Hello", "nomic-embed-text").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_ollama_embedding_error_handling() {
        let client = MockHttpClient::new().with_error(TEST_URL, "connection refused");

        let provider = OllamaEmbeddingProvider::with_base_url(client, "http://localhost:11434");
        let result = provider.embed("Hello", "nomic-embed-text").await;

        assert!(result.is_err());
    }
}
