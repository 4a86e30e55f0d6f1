//! Chat domain types and the chat backend trait

mod message;
mod provider;
mod request;
mod response;

pub use message::{Message, MessageRole};
pub use provider::{ChatProvider, ChatStream};
pub use request::{ChatRequest, Sampling, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
pub use response::{ChatResponse, ModelInfo, Usage};

#[cfg(test)]
pub use provider::mock::MockChatProvider;
