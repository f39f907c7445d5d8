use serde::{Deserialize, Serialize};

/// Body of `POST /v1/story`.
/// `story` holds either the generated text or the warning line shown in the output box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: String,
    pub success: bool,
}
