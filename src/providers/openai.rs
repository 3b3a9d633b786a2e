//! OpenAI Provider implementation
//!
//! Any backend speaking the OpenAI chat completion dialect (aimlapi, groq,
//! openrouter, openai itself)

use super::{Provider, ProviderError};
use crate::config::ProviderConfig;
use crate::models::openai::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Longest upstream error body kept in a `ProviderError::Status`
const MAX_ERROR_BODY: usize = 300;

/// OpenAI-compatible provider bound to one configured backend
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Create a provider; `default_timeout` applies unless the config overrides it
    pub fn new(config: ProviderConfig, default_timeout: Duration) -> Result<Self> {
        let timeout = config
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(default_timeout);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| format!("Failed to create HTTP client for provider '{}'", config.name))?;

        Ok(Self { config, client })
    }

    /// Build the request URL
    fn build_url(&self) -> String {
        let base_url = self.config.base_url.trim_end_matches('/');
        format!("{}/chat/completions", base_url)
    }

    /// Extract a readable message from an upstream error body
    fn error_message(body: &str) -> String {
        if let Ok(error_response) = serde_json::from_str::<OpenAIErrorResponse>(body) {
            return error_response.error.message;
        }

        let mut message: String = body.chars().take(MAX_ERROR_BODY).collect();
        if body.chars().count() > MAX_ERROR_BODY {
            message.push_str("...");
        }
        message
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        debug!("Sending chat completion request to {}", self.config.name);

        let response = self
            .client
            .post(self.build_url())
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        serde_json::from_str::<ChatResponse>(&body)
            .map_err(|e| ProviderError::Malformed(format!("invalid JSON body: {}", e)))
    }
}
