pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use crate::provider::LlmError;

/// Known OpenAI-compatible backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    OpenAi,
    /// Any endpoint speaking the OpenAI chat API; requires an explicit base url
    OpenAiCompatible,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Result<Self, LlmError> {
        match name.to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            "openai_compatible" | "openai-compatible" => Ok(Self::OpenAiCompatible),
            other => Err(LlmError::Config(format!("unknown provider: {}", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
            Self::OpenAiCompatible => "openai_compatible",
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::Groq => Some("https://api.groq.com/openai/v1"),
            Self::OpenAi => Some("https://api.openai.com/v1"),
            Self::OpenAiCompatible => None,
        }
    }
}
