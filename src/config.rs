use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Messages endpoint of the text-generation service
    #[serde(default = "default_anthropic_api_url")]
    pub anthropic_api_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    /// API version header value
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,

    /// Maximum output tokens per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Location of the local state file
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Seeds the credential store when no key has been saved yet
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
}

fn default_anthropic_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_url: default_anthropic_api_url(),
            anthropic_model: default_anthropic_model(),
            anthropic_version: default_anthropic_version(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            storage_path: None,
            anthropic_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves the state file, falling back to the platform data directory
    pub fn resolved_storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }

        dirs::data_local_dir()
            .map(|dir| dir.join("moodbuy").join("state.json"))
            .unwrap_or_else(|| PathBuf::from("moodbuy-state.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.anthropic_api_url, "https://api.anthropic.com/v1/messages");
        assert_eq!(config.anthropic_model, "claude-sonnet-4-20250514");
        assert_eq!(config.anthropic_version, "2023-06-01");
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_overrides_from_env_pairs() {
        let vars = vec![
            ("MAX_TOKENS".to_string(), "800".to_string()),
            ("STORAGE_PATH".to_string(), "/tmp/moodbuy.json".to_string()),
            ("ANTHROPIC_API_KEY".to_string(), "sk-test".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.max_tokens, 800);
        assert_eq!(
            config.resolved_storage_path(),
            PathBuf::from("/tmp/moodbuy.json")
        );
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_default_storage_path_ends_with_state_file() {
        let config = Config::default();
        assert!(config.resolved_storage_path().ends_with("state.json")
            || config.resolved_storage_path().ends_with("moodbuy-state.json"));
    }
}
