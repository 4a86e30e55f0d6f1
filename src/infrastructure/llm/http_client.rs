//! JSON-over-HTTP transport shared by the Ollama backends

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::domain::DomainError;

/// Raw response body delivered incrementally
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DomainError>> + Send>>;

/// Transport seam so providers can run against canned responses
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DomainError>;

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    /// POST a JSON body and hand back the undecoded response body
    async fn post_json_stream(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError>;
}

fn transport_error(message: String) -> DomainError {
    DomainError::provider("http", message)
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose requests give up after `timeout`, streamed bodies included
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(|client| Self { client })
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))
    }

    /// Send the request; non-2xx statuses become errors carrying the body text
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        Err(transport_error(format!("HTTP {}: {}", status, detail)))
    }

    async fn decode(response: reqwest::Response) -> Result<serde_json::Value, DomainError> {
        response
            .json()
            .await
            .map_err(|e| transport_error(format!("Invalid JSON body: {}", e)))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DomainError> {
        Self::decode(self.execute(self.client.get(url)).await?).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        Self::decode(self.execute(self.client.post(url).json(body)).await?).await
    }

    async fn post_json_stream(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError> {
        let response = self.execute(self.client.post(url).json(body)).await?;

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| transport_error(format!("Stream error: {}", e))));

        Ok(Box::pin(chunks))
    }
}
