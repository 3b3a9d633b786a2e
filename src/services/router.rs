//! Completion Router
//!
//! Tries the configured providers in priority order and returns the first
//! successful completion. A failing provider is logged and skipped; it is
//! never retried within the same request.

use crate::config::{AppConfig, CompletionOptions};
use crate::models::openai::{ChatMessage, ChatRequest};
use crate::providers::{OpenAIProvider, Provider, ProviderError};
use crate::utils::logging::create_request_log_summary;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const COIN_INSTRUCTION: &str = "You are a crypto token expert. Generate a catchy Name and a 5-letter Symbol \
for a new memecoin based on the user's idea. Respond with exactly Name|Symbol, the symbol in uppercase, \
without quotes or any other text.";

const DESCRIPTION_INSTRUCTION: &str = "You are a crypto marketer. Write a 2-sentence hype description \
for a new token. Be energetic and degen-friendly.";

/// What the generated text is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// `Name|SYMBOL` suggestion
    Coin,
    /// Two sentences of promotional copy
    Description,
}

impl Intent {
    /// Map the request `type` tag; anything other than "coin" means description
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("coin") => Intent::Coin,
            _ => Intent::Description,
        }
    }

    /// Fixed system instruction for this intent
    pub fn system_instruction(&self) -> &'static str {
        match self {
            Intent::Coin => COIN_INSTRUCTION,
            Intent::Description => DESCRIPTION_INSTRUCTION,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Coin => "coin",
            Intent::Description => "description",
        }
    }
}

/// One completion invocation
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub intent: Intent,
}

/// Successful completion
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Trimmed message content
    pub text: String,
    /// Provider that produced it
    pub provider: String,
}

/// Caller-visible router failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// No provider has a credential; no request was sent
    #[error("no completion provider is configured")]
    NoProvidersConfigured,

    /// Every provider was tried once and none succeeded
    #[error("all {attempts} completion providers failed")]
    AllProvidersFailed { attempts: usize },
}

/// Completion Router
///
/// Holds the effective providers in priority order. Immutable after construction
/// and shared across requests through `Arc`.
pub struct CompletionRouter {
    providers: Vec<Arc<dyn Provider>>,
    options: CompletionOptions,
}

impl CompletionRouter {
    /// Create a router over already-built providers, kept in the given order
    pub fn new(providers: Vec<Arc<dyn Provider>>, options: CompletionOptions) -> Self {
        Self { providers, options }
    }

    /// Build one OpenAI-compatible provider per credentialed entry of the configuration
    pub fn from_config(config: &AppConfig, default_timeout: Duration) -> Result<Self> {
        let providers = config
            .effective_providers()
            .map(|provider_config| {
                OpenAIProvider::new(provider_config.clone(), default_timeout)
                    .map(|provider| Arc::new(provider) as Arc<dyn Provider>)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Completion router initialized with {} provider(s): [{}]",
            providers.len(),
            providers.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ")
        );

        Ok(Self::new(providers, config.completion))
    }

    /// Number of effective providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Provider names in priority order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Build the upstream request for one provider
    fn build_request(&self, provider: &dyn Provider, request: &CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: provider.model().to_string(),
            messages: vec![
                ChatMessage::system(request.intent.system_instruction()),
                ChatMessage::user(request.prompt.clone()),
            ],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        }
    }

    /// Produce one completion, falling back through the providers in order
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completion, RouterError> {
        if self.providers.is_empty() {
            warn!("Completion requested but no provider is configured");
            return Err(RouterError::NoProvidersConfigured);
        }

        for (position, provider) in self.providers.iter().enumerate() {
            let chat_request = self.build_request(provider.as_ref(), request);
            debug!(
                provider = provider.name(),
                intent = request.intent.as_str(),
                "📤 Upstream request: {}",
                create_request_log_summary(&chat_request)
            );

            let outcome = provider.chat_complete(chat_request).await.and_then(|response| {
                response
                    .first_content()
                    .map(|content| content.trim().to_string())
                    .ok_or_else(|| ProviderError::Malformed("missing choices[0].message.content".to_string()))
            });

            match outcome {
                Ok(text) => {
                    info!(
                        provider = provider.name(),
                        attempt = position + 1,
                        "Completion served"
                    );
                    return Ok(Completion {
                        text,
                        provider: provider.name().to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        attempt = position + 1,
                        "Provider failed, trying next: {}",
                        e
                    );
                }
            }
        }

        Err(RouterError::AllProvidersFailed {
            attempts: self.providers.len(),
        })
    }
}
