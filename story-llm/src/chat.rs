use openai_dive::v1::resources::chat::{ChatCompletionResponse, ChatMessage, ChatMessageContent};

/// Build a single user-role message
pub fn user_message(text: impl Into<String>) -> ChatMessage {
    ChatMessage::User {
        content: ChatMessageContent::Text(text.into()),
        name: None,
    }
}

/// Text of the top choice, if the assistant answered with plain text
pub fn response_text(response: &ChatCompletionResponse) -> Option<String> {
    match response.choices.first().map(|choice| &choice.message) {
        Some(ChatMessage::Assistant { content: Some(ChatMessageContent::Text(text)), .. }) => Some(text.clone()),
        _ => None,
    }
}
