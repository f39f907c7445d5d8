pub mod handler;
pub mod types;

pub use handler::handle_generate_story;
pub use types::StoryResponse;
