use async_trait::async_trait;
use openai_dive::v1::resources::chat::{ChatCompletionParameters, ChatCompletionResponse};
use thiserror::Error;

/// Errors raised while talking to a completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(value: reqwest::Error) -> Self {
        LlmError::Network(value.to_string())
    }
}

/// A backend able to answer chat completion requests
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name, used in logs
    fn name(&self) -> &str;

    /// Issue one blocking (non-streaming) chat completion call
    async fn chat(&self, request: ChatCompletionParameters) -> Result<ChatCompletionResponse, LlmError>;
}
