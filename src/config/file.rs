//! Provider configuration loading
//!
//! Loads the priority-ordered provider list from a JSON file, or derives it
//! from well-known environment variables when no file is present

use super::settings::{get_env_non_empty, get_env_or_default};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Application configuration: providers in priority order plus shared completion options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider configurations; array order is priority order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Sampling options shared by every provider
    #[serde(default)]
    pub completion: CompletionOptions,
}

/// One OpenAI-compatible chat completion backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Label used in logs
    pub name: String,

    /// Base URL; requests go to `{base_url}/chat/completions`
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    /// Bearer credential; empty means the provider is skipped
    #[serde(rename = "apiKey", default)]
    pub api_key: String,

    /// Environment variable to read the credential from when `apiKey` is empty
    #[serde(rename = "apiKeyEnv", default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Upstream model identifier
    pub model: String,

    /// Per-call timeout override in seconds
    #[serde(rename = "timeoutSecs", default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Sampling options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(rename = "maxTokens", default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    100
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Built-in providers read from the environment: (name, env prefix, base url, model)
const ENV_PROVIDERS: [(&str, &str, &str, &str); 4] = [
    ("aimlapi", "AIML", "https://api.aimlapi.com/v1", "mistralai/mistral-7b-instruct-v0.2"),
    ("groq", "GROQ", "https://api.groq.com/openai/v1", "llama-3.1-8b-instant"),
    ("openrouter", "OPENROUTER", "https://openrouter.ai/api/v1", "mistralai/mistral-7b-instruct"),
    ("openai", "OPENAI", "https://api.openai.com/v1", "gpt-4o-mini"),
];

impl ProviderConfig {
    /// Whether this provider has a usable credential
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_json(&content)
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: AppConfig =
            serde_json::from_str(content).with_context(|| "Failed to parse config JSON")?;

        config.resolve_credentials();
        config.validate()?;

        debug!("Loaded {} providers", config.providers.len());
        Ok(config)
    }

    /// Build the provider list from environment variables
    ///
    /// Every built-in slot is listed; slots without a key are kept but disabled.
    /// `{PREFIX}_BASE_URL` and `{PREFIX}_MODEL` override the defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let providers = ENV_PROVIDERS
            .iter()
            .map(|(name, prefix, base_url, model)| ProviderConfig {
                name: name.to_string(),
                base_url: get_env_or_default(&format!("{}_BASE_URL", prefix), base_url),
                api_key: get_env_non_empty(&format!("{}_API_KEY", prefix)).unwrap_or_default(),
                api_key_env: Some(format!("{}_API_KEY", prefix)),
                model: get_env_or_default(&format!("{}_MODEL", prefix), model),
                timeout_secs: None,
            })
            .collect();

        let config = Self {
            providers,
            completion: CompletionOptions::default(),
        };
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from default locations
    /// Searches in order:
    /// 1. ~/.config/coinforge/coinforge.json
    /// 2. ./coinforge.json
    ///
    /// Falls back to the environment when no file is found.
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("coinforge").join("coinforge.json");
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        let local_path = Path::new("coinforge.json");
        if local_path.exists() {
            return Self::load(local_path);
        }

        info!("No provider configuration file found, using environment variables");
        Self::from_env()
    }

    /// Trim credentials and fill empty ones from their `apiKeyEnv` variable
    fn resolve_credentials(&mut self) {
        for provider in &mut self.providers {
            provider.api_key = provider.api_key.trim().to_string();
            if provider.api_key.is_empty() {
                if let Some(var) = &provider.api_key_env {
                    provider.api_key = get_env_non_empty(var).unwrap_or_default();
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();

        for provider in &self.providers {
            if provider.name.trim().is_empty() {
                anyhow::bail!("Every provider must have a name");
            }

            if !names.insert(provider.name.as_str()) {
                anyhow::bail!("Duplicate provider name '{}'", provider.name);
            }

            if !provider.base_url.starts_with("http") {
                anyhow::bail!("Invalid base URL for provider '{}': {}", provider.name, provider.base_url);
            }

            if provider.model.trim().is_empty() {
                anyhow::bail!("Provider '{}' must have a model configured", provider.name);
            }

            if provider.timeout_secs == Some(0) {
                anyhow::bail!("Timeout for provider '{}' cannot be 0", provider.name);
            }
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            anyhow::bail!("Temperature must be between 0.0 and 2.0, got {}", self.completion.temperature);
        }

        if self.completion.max_tokens == 0 {
            anyhow::bail!("maxTokens cannot be 0");
        }

        if self.effective_providers().next().is_none() {
            warn!("No provider has a credential; completion requests will fail until one is configured");
        }

        Ok(())
    }

    /// Providers with a credential, in priority order
    pub fn effective_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.is_enabled())
    }
}
