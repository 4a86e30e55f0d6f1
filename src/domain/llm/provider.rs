use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

use super::{ChatRequest, ChatResponse, ModelInfo};
use crate::domain::DomainError;

/// Stream of generated text fragments
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Trait for chat backends (a local model-serving daemon in production)
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: ChatRequest) -> Result<ChatResponse, DomainError>;

    /// Send a streaming chat completion request
    async fn chat_stream(
        &self,
        model: &str,
        request: ChatRequest,
    ) -> Result<ChatStream, DomainError>;

    /// List models installed on the backend
    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError>;

    /// Check whether the backend answers at all
    async fn health_check(&self) -> bool {
        self.list_models().await.is_ok()
    }

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use futures::stream;
    use std::sync::Mutex;

    #[derive(Debug)]
    pub struct MockChatProvider {
        response: Option<String>,
        error: Option<String>,
        models: Vec<String>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl MockChatProvider {
        pub fn new() -> Self {
            Self {
                response: None,
                error: None,
                models: vec!["mock-model".to_string()],
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(mut self, response: impl Into<String>) -> Self {
            self.response = Some(response.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Requests received so far
        pub fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Default for MockChatProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ChatProvider for MockChatProvider {
        async fn chat(
            &self,
            model: &str,
            request: ChatRequest,
        ) -> Result<ChatResponse, DomainError> {
            self.requests.lock().unwrap().push(request);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            let content = self
                .response
                .clone()
                .ok_or_else(|| DomainError::provider("mock", "No mock response configured"))?;

            Ok(ChatResponse::new(model, Message::assistant(content)))
        }

        async fn chat_stream(
            &self,
            model: &str,
            request: ChatRequest,
        ) -> Result<ChatStream, DomainError> {
            let response = self.chat(model, request).await?;

            let fragments: Vec<Result<String, DomainError>> = response
                .content()
                .split_inclusive(' ')
                .map(|word| Ok(word.to_string()))
                .collect();

            Ok(Box::pin(stream::iter(fragments)))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            Ok(self
                .models
                .iter()
                .map(|name| ModelInfo {
                    name: name.clone(),
                    size: None,
                    modified_at: None,
                })
                .collect())
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockChatProvider;
    use super::*;
    use crate::domain::llm::Message;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_stream_reassembles_response() {
        let provider = MockChatProvider::new().with_response("one two three");
        let request = ChatRequest::new(vec![Message::user("count")]);

        let mut stream = provider.chat_stream("m", request).await.unwrap();
        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            text.push_str(&fragment.unwrap());
        }

        assert_eq!(text, "one two three");
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_default_health_check_follows_list_models() {
        assert!(MockChatProvider::new().health_check().await);
        assert!(!MockChatProvider::new().with_error("down").health_check().await);
    }
}
