use std::fs;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use json_comments::StripComments;
use serde::{Serialize, Deserialize};
use storyteller_llm::LlmClient;
use tracing::warn;

use crate::export::EXPORT_FILENAME;
use crate::runners::storyteller::Storyteller;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub provider: String,
    /// Overrides the provider's default endpoint
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            base_url: Some("https://api.groq.com/openai/v1".to_string()),
            api_key_env: "GROK_API_KEY".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_export_file")]
    pub export_file: PathBuf,
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_export_file() -> PathBuf {
    PathBuf::from(EXPORT_FILENAME)
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            export_file: default_export_file(),
            temperature: None,
        }
    }
}

impl StoryConfig {
    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".config"))
                    .ok_or("Could not find home directory")
            })?;

        Ok(config_dir.join("storyteller").join("config.json"))
    }

    /// Load the user config, falling back to defaults when there is none
    pub fn load() -> Result<StoryConfig, Box<dyn std::error::Error>> {
        let config_path = Self::config_path()?;
        Self::load_or_default(&config_path)
    }

    pub fn load_or_default(path: &Path) -> Result<StoryConfig, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(StoryConfig::default());
        }
        Self::load_from(path)
    }

    /// Parse a JSON config file; `//` and `/* */` comments are allowed
    pub fn load_from(path: &Path) -> Result<StoryConfig, Box<dyn std::error::Error>> {
        let content_bytes = fs::read(path)?;
        let content_stripped = StripComments::new(&content_bytes[..]);
        let config: StoryConfig = serde_json::from_reader(content_stripped)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        // Set file permissions to 600 (user read/write only) on Unix systems
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(config_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(config_path, perms)?;
        }

        Ok(())
    }

    /// API key from the configured environment variable.
    /// A missing key is not an error here; the provider rejects the first call instead.
    pub fn api_key(&self) -> String {
        match std::env::var(&self.provider.api_key_env) {
            Ok(key) => key,
            Err(_) => {
                warn!("{} is not set, completion calls will fail to authenticate", self.provider.api_key_env);
                String::new()
            }
        }
    }

    pub fn get_llm(&self) -> Result<(LlmClient, String), Box<dyn std::error::Error>> {
        let provider_config = &self.provider;
        let llm = LlmClient::create_provider(
            &provider_config.provider,
            provider_config.base_url.as_deref(),
            &self.api_key())
            .map_err(|e| format!("Failed to create {} client: {}", provider_config.provider, e))?;

        Ok((llm, provider_config.model.clone()))
    }

    pub fn storyteller(&self) -> Result<Storyteller, Box<dyn std::error::Error>> {
        let (llm, model) = self.get_llm()?;
        Ok(Storyteller::new(llm, model).with_temperature(self.temperature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_groq() {
        let config = StoryConfig::default();
        assert_eq!(config.provider.provider, "groq");
        assert_eq!(config.provider.model, "llama-3.3-70b-versatile");
        assert_eq!(config.provider.api_key_env, "GROK_API_KEY");
        assert_eq!(config.export_file, PathBuf::from("social_good_story.txt"));
    }

    #[test]
    fn loads_json_with_comments_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{
            // local llama.cpp server
            "provider": {
                "provider": "openai_compatible",
                "base_url": "http://localhost:8080/v1",
                "api_key_env": "LOCAL_KEY",
                "model": "llama3"
            },
            /* keep default export file */
            "temperature": 0.8
        }"#).unwrap();

        let config = StoryConfig::load_from(&path).unwrap();
        assert_eq!(config.provider.provider, "openai_compatible");
        assert_eq!(config.provider.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.export_file, PathBuf::from(EXPORT_FILENAME));
        assert_eq!(config.temperature, Some(0.8));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("config.json");

        assert_eq!(StoryConfig::load_or_default(&path).unwrap(), StoryConfig::default());
    }

    #[test]
    fn partial_provider_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "provider": { "model": "llama-3.1-8b-instant" } }"#).unwrap();

        let config = StoryConfig::load_or_default(&path).unwrap();
        assert_eq!(config.provider.model, "llama-3.1-8b-instant");
        assert_eq!(config.provider.provider, "groq");
        assert_eq!(config.provider.api_key_env, "GROK_API_KEY");
        assert_eq!(config.provider.base_url.as_deref(), Some("https://api.groq.com/openai/v1"));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = StoryConfig { temperature: Some(0.2), ..StoryConfig::default() };

        config.save_to(&path).unwrap();
        assert_eq!(StoryConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_key_still_builds_a_client() {
        let config = StoryConfig {
            provider: ProviderConfig {
                api_key_env: "STORYTELLER_TEST_UNSET_KEY".to_string(),
                ..ProviderConfig::default()
            },
            ..StoryConfig::default()
        };
        assert_eq!(config.api_key(), "");
        let teller = config.storyteller().unwrap();
        assert_eq!(teller.model(), "llama-3.3-70b-versatile");
        assert_eq!(teller.provider_name(), "groq");
    }

    #[test]
    fn unknown_provider_fails() {
        let config = StoryConfig {
            provider: ProviderConfig { provider: "nope".to_string(), ..ProviderConfig::default() },
            ..StoryConfig::default()
        };
        assert!(config.get_llm().is_err());
    }
}
