//! Ollama chat provider implementation

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::http_client::{ByteStream, HttpClientTrait};
use crate::domain::llm::{
    ChatProvider, ChatRequest, ChatResponse, ChatStream, Message, ModelInfo, Usage,
};
use crate::domain::DomainError;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Ollama chat provider
#[derive(Debug)]
pub struct OllamaChatProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> OllamaChatProvider<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    fn build_request(&self, model: &str, request: &ChatRequest, stream: bool) -> serde_json::Value {
        let messages: Vec<OllamaMessage> = request
            .messages
            .iter()
            .map(OllamaMessage::from_domain)
            .collect();

        let mut options = serde_json::json!({
            "temperature": request.sampling.temperature,
            "top_p": request.sampling.top_p,
        });

        if let Some(max_tokens) = request.sampling.max_tokens {
            options["num_predict"] = serde_json::json!(max_tokens);
        }

        serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": stream,
            "options": options,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ChatResponse, DomainError> {
        let response: OllamaChatResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("ollama", format!("Failed to parse chat response: {}", e))
        })?;

        let content = response.message.map(|m| m.content).unwrap_or_default();
        let mut chat_response = ChatResponse::new(response.model, Message::assistant(content));

        if let (Some(prompt), Some(completion)) = (response.prompt_eval_count, response.eval_count)
        {
            chat_response = chat_response.with_usage(Usage::new(prompt, completion));
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> ChatProvider for OllamaChatProvider<C> {
    async fn chat(&self, model: &str, request: ChatRequest) -> Result<ChatResponse, DomainError> {
        let body = self.build_request(model, &request, false);
        let response = self.client.post_json(&self.chat_url(), &body).await?;

        let response = self.parse_response(response)?;
        info!(
            model = model,
            message_count = request.messages.len(),
            "Chat completion successful"
        );

        Ok(response)
    }

    async fn chat_stream(
        &self,
        model: &str,
        request: ChatRequest,
    ) -> Result<ChatStream, DomainError> {
        let body = self.build_request(model, &request, true);
        let byte_stream = self.client.post_json_stream(&self.chat_url(), &body).await?;

        debug!(model = model, "Streaming chat started");
        Ok(ndjson_fragments(byte_stream))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
        let response = self.client.get_json(&self.tags_url()).await?;

        let tags: OllamaTagsResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("ollama", format!("Failed to parse model list: {}", e))
        })?;

        debug!(count = tags.models.len(), "Fetched models");
        Ok(tags.models)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

/// Turn a newline-delimited JSON byte stream into content fragments
///
/// Lines may be split across network chunks, so bytes are buffered until a
/// full line is available.
fn ndjson_fragments(byte_stream: ByteStream) -> ChatStream {
    let state = (byte_stream, Vec::<u8>::new(), VecDeque::new(), false);

    let stream = futures::stream::unfold(
        state,
        |(mut byte_stream, mut buffer, mut pending, mut finished)| async move {
            loop {
                if let Some(item) = pending.pop_front() {
                    return Some((item, (byte_stream, buffer, pending, finished)));
                }

                if finished {
                    return None;
                }

                match byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        buffer.extend_from_slice(&bytes);
                        while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                            let line: Vec<u8> = buffer.drain(..=pos).collect();
                            if let Some(item) = parse_stream_line(&line) {
                                pending.push_back(item);
                            }
                        }
                    }
                    Some(Err(e)) => {
                        pending.push_back(Err(e));
                        finished = true;
                    }
                    None => {
                        let rest = std::mem::take(&mut buffer);
                        if let Some(item) = parse_stream_line(&rest) {
                            pending.push_back(item);
                        }
                        finished = true;
                    }
                }
            }
        },
    );

    Box::pin(stream)
}

fn parse_stream_line(line: &[u8]) -> Option<Result<String, DomainError>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    let chunk: OllamaChatResponse = match serde_json::from_str(text) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(DomainError::provider(
                "ollama",
                format!("Invalid stream line: {}", e),
            )));
        }
    };

    if let Some(error) = chunk.error {
        return Some(Err(DomainError::provider("ollama", error)));
    }

    chunk
        .message
        .map(|m| m.content)
        .filter(|content| !content.is_empty())
        .map(Ok)
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: &'static str,
    content: String,
}

impl OllamaMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    model: String,
    message: Option<OllamaResponseMessage>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}
