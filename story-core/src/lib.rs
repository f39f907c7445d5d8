pub mod config;
pub mod export;
pub mod runners;

pub use config::config::{ProviderConfig, StoryConfig};
pub use export::{save_to_file, save_to_path, EXPORT_FILENAME};
pub use runners::storyteller::{
    generate_stories, render_outcome, story_prompt, Language, Stories, StoryError, StoryRequest, Storyteller,
    STORY_SEPARATOR,
};
