use openai_dive::v1::resources::chat::ChatCompletionParametersBuilder;
use storyteller_llm::{response_text, user_message, LlmClient, LlmError};
use thiserror::Error;
use tracing::{debug, error, info};

use super::prompt::{story_prompt, StoryRequest};

/// Literal token placed between variations
pub const STORY_SEPARATOR: &str = "\n\n---\n\n";

pub const MIN_VARIATIONS: i64 = 1;
pub const MAX_VARIATIONS: i64 = 3;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("{0}")]
    Completion(#[from] LlmError),

    #[error("model returned no text content")]
    EmptyResponse,

    #[error("variations must be between 1 and 3, got {0}")]
    VariationsOutOfRange(i64),

    #[error("invalid completion request: {0}")]
    Request(String),
}

/// Successfully generated story variations
#[derive(Debug, Clone, PartialEq)]
pub struct Stories {
    pub variants: Vec<String>,
}

impl Stories {
    pub fn joined(&self) -> String {
        self.variants.join(STORY_SEPARATOR)
    }
}

/// Text shown in the output widget for either outcome
pub fn render_outcome(outcome: &Result<Stories, StoryError>) -> String {
    match outcome {
        Ok(stories) => stories.joined(),
        Err(e) => format!("⚠️ Error: {}", e),
    }
}

/// Generate `request.variations` stories, one completion call each, in sequence.
/// The first failing call aborts the run and earlier variants are dropped.
pub async fn generate_stories(
    llm: &LlmClient,
    model: &str,
    temperature: Option<f32>,
    request: &StoryRequest,
) -> Result<Stories, StoryError> {
    if !(MIN_VARIATIONS..=MAX_VARIATIONS).contains(&request.variations) {
        return Err(StoryError::VariationsOutOfRange(request.variations));
    }

    let mut builder = ChatCompletionParametersBuilder::default();
    builder
        .model(model)
        .messages(vec![user_message(story_prompt(request))]);
    if let Some(temperature) = temperature {
        builder.temperature(temperature);
    }
    let params = builder.build().map_err(|e| StoryError::Request(e.to_string()))?;

    let mut variants = Vec::with_capacity(request.variations as usize);
    for index in 0..request.variations {
        debug!("completion {}/{} on {} model={}", index + 1, request.variations, llm.provider().name(), model);

        let response = llm.chat(params.clone()).await.inspect_err(|e| {
            error!("completion {}/{} failed: {}", index + 1, request.variations, e);
        })?;
        let text = response_text(&response).ok_or(StoryError::EmptyResponse)?;
        variants.push(text);
    }

    info!("generated {} story variation(s)", variants.len());
    Ok(Stories { variants })
}

/// Client, model and sampling settings bound together at startup
#[derive(Clone)]
pub struct Storyteller {
    llm: LlmClient,
    model: String,
    temperature: Option<f32>,
}

impl Storyteller {
    pub fn new(llm: LlmClient, model: impl Into<String>) -> Self {
        Self { llm, model: model.into(), temperature: None }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.llm.provider().name()
    }

    pub async fn generate(&self, request: &StoryRequest) -> Result<Stories, StoryError> {
        generate_stories(&self.llm, &self.model, self.temperature, request).await
    }
}
