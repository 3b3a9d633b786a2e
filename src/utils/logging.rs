//! Logging utilities
//!
//! Subscriber setup and helpers that keep prompt text out of logs at full length

use crate::config::settings::LoggingConfig;
use crate::models::openai::{ChatMessage, ChatRequest};
use anyhow::Result;

/// Set to true to include full prompts and system instructions in debug logs
pub const VERBOSE_REQUEST_LOGGING: bool = false;

/// Initialize the global tracing subscriber
///
/// `json` format is meant for production, `text` for development.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::info!("Logging system initialized");
    Ok(())
}

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    let total = s.chars().count();
    if total > max_len {
        let head: String = s.chars().take(max_len).collect();
        format!("{}... ({} chars truncated)", head, total - max_len)
    } else {
        s.to_string()
    }
}

fn filter_message(msg: &ChatMessage) -> serde_json::Value {
    // System instructions are fixed, so a short prefix identifies them
    let max_len = if msg.role == "system" { 40 } else { 200 };
    serde_json::json!({
        "role": msg.role,
        "content": truncate_content(&msg.content, max_len),
    })
}

/// Create a filtered summary of an upstream request for logging
pub fn create_request_log_summary(request: &ChatRequest) -> serde_json::Value {
    if VERBOSE_REQUEST_LOGGING {
        serde_json::to_value(request).unwrap_or(serde_json::json!({"error": "serialize failed"}))
    } else {
        let messages: Vec<serde_json::Value> = request.messages.iter().map(filter_message).collect();

        serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": messages,
        })
    }
}
