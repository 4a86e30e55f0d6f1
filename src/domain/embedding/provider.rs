//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for embedding backends (a local model-serving daemon in production)
///
/// One call embeds one text; callers batch on their side if they need to.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate an embedding vector for `text` using `model`
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock embedding provider for testing
    ///
    /// Produces a letter-frequency vector, so texts sharing vocabulary end up
    /// close to each other under cosine distance.
    #[derive(Debug, Default)]
    pub struct MockEmbeddingProvider {
        error: Option<String>,
        fail_on_call: Option<usize>,
        calls: AtomicUsize,
    }

    impl MockEmbeddingProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail every call
        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Fail only the n-th call (1-based)
        pub fn failing_on_call(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn vector_for(text: &str) -> Vec<f32> {
            let mut vector = vec![0.0f32; 27];

            for c in text.chars().flat_map(|c| c.to_lowercase()) {
                if c.is_ascii_lowercase() {
                    vector[(c as u8 - b'a') as usize] += 1.0;
                }
            }

            vector[26] = 0.01;
            vector
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>, DomainError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            if self.fail_on_call == Some(call) {
                return Err(DomainError::provider(
                    "mock",
                    format!("Embedding call {} failed", call),
                ));
            }

            Ok(Self::vector_for(text))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new();

            let first = provider.embed("Hello", "mock-embedding").await.unwrap();
            let second = provider.embed("Hello", "mock-embedding").await.unwrap();

            assert_eq!(first, second);
            assert_eq!(first.len(), 27);
            assert_eq!(provider.call_count(), 2);
        }

        #[tokio::test]
        async fn test_failing_on_specific_call() {
            let provider = MockEmbeddingProvider::new().failing_on_call(2);

            assert!(provider.embed("a", "m").await.is_ok());
            assert!(provider.embed("b", "m").await.is_err());
            assert!(provider.embed("c", "m").await.is_ok());
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new().with_error("daemon unreachable");

            assert!(provider.embed("Hello", "m").await.is_err());
        }
    }
}
