//! Chat backend implementations

mod http_client;
mod ollama;

pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use ollama::{OllamaChatProvider, DEFAULT_OLLAMA_BASE_URL};

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
