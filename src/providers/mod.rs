//! Provider module
//!
//! Defines the Provider trait and the OpenAI-compatible implementation

pub mod openai;

use crate::models::openai::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single provider attempt
///
/// The completion router swallows these and moves on to the next provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection failure or timeout
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Upstream chat completion backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Send one chat completion request (non-streaming, no retry)
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

pub use openai::OpenAIProvider;
