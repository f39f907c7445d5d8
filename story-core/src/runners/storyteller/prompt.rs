use std::fmt;

use serde::{Deserialize, Serialize};

/// Output language offered by the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Hindi => write!(f, "Hindi"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "english" => Ok(Language::English),
            "hindi" => Ok(Language::Hindi),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

fn default_variations() -> i64 {
    1
}

/// The eight form fields of one generate click.
/// Field contents are not validated, empty strings go into the prompt as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub helpers: String,
    #[serde(default)]
    pub desired_change: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub facts: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_variations")]
    pub variations: i64,
}

pub fn story_prompt(request: &StoryRequest) -> String {
    format!(
        r#"Create an inspiring social good story in {language}.
Details:
- Issue: {issue}
- Impact: {impact}
- Helpers: {helpers}
- Desired Change: {desired_change}
- Location: {location}
- Facts: {facts}
Format:
**Title: <Story Title>**
<Paragraph 1>
<Paragraph 2>
<Call to Action>
"#,
        language = request.language,
        issue = request.issue,
        impact = request.impact,
        helpers = request.helpers,
        desired_change = request.desired_change,
        location = request.location,
        facts = request.facts,
    )
}
