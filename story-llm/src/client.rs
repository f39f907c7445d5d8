use std::sync::Arc;

use openai_dive::v1::resources::chat::{ChatCompletionParameters, ChatCompletionResponse};

use crate::provider::{LlmError, LlmProvider};
use crate::providers::{OpenAiCompatProvider, ProviderKind};

/// Cheaply clonable handle on a completion provider.
/// Built once at startup and shared by every caller.
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn LlmProvider>,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Create a client for a named provider.
    /// `base_url` overrides the provider default and is mandatory for `openai_compatible`.
    pub fn create_provider(provider: &str, base_url: Option<&str>, api_key: &str) -> Result<Self, LlmError> {
        let kind = ProviderKind::parse(provider)?;
        let base_url = base_url
            .filter(|url| !url.is_empty())
            .or(kind.default_base_url())
            .ok_or_else(|| LlmError::Config(format!("provider {} requires a base_url", kind.name())))?;

        let provider = OpenAiCompatProvider::new(kind.name(), base_url, api_key)?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub async fn chat(&self, request: ChatCompletionParameters) -> Result<ChatCompletionResponse, LlmError> {
        self.provider.chat(request).await
    }
}
