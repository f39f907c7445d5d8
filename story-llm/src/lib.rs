pub mod client;
pub mod providers;
pub mod provider;
pub mod chat;

// Re-export our client
pub use client::LlmClient;

pub use provider::{LlmError, LlmProvider};
pub use providers::ProviderKind;
pub use chat::{user_message, response_text};
