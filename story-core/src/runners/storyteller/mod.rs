pub mod prompt;
pub mod story;

pub use prompt::{story_prompt, Language, StoryRequest};
pub use story::{generate_stories, render_outcome, Stories, StoryError, Storyteller, STORY_SEPARATOR};
